//! Value and expression parsing errors (codes `5000-5999`).

error_record! {
    /// A cell could not be parsed into its schema type.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ValueParseError => ValueParse {
        /// 1-based row number as a user would count it.
        row: usize,
        column: String,
        raw: String,
        message: String,
    }
}

error_record! {
    /// A date literal does not match the expected format.
    #[error("invalid date '{raw}' (expected format {format})")]
    InvalidDateError => InvalidDate {
        raw: String,
        format: String,
    }
}

error_record! {
    /// A tokenizer or parser met something it did not expect.
    #[error("unexpected '{found}' at position {position} in '{input}', expected {expected}")]
    UnexpectedTokenError => UnexpectedToken {
        input: String,
        /// 0-based character offset.
        position: usize,
        found: String,
        expected: String,
    }
}

error_union! {
    /// Failures of literal and expression parsing.
    ParseError {
        ValueParse(ValueParseError),
        InvalidDate(InvalidDateError),
        UnexpectedToken(UnexpectedTokenError),
    }
}
