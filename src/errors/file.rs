//! File handling errors (codes `12000-12999`).

use super::parsing::ValueParseError;

error_record! {
    /// The path does not exist.
    #[error("file not found: {path}")]
    FileNotFoundError => FileNotFound {
        path: String,
    }
}

error_record! {
    /// The process may not read or write the path.
    #[error("permission denied: {path}")]
    PermissionDeniedError => PermissionDenied {
        path: String,
    }
}

error_record! {
    /// The file extension maps to no known format.
    #[error("unsupported file format for '{path}' (extension: {})", .extension.as_deref().unwrap_or("<none>"))]
    UnsupportedFormatError => UnsupportedFormat {
        path: String,
        extension: Option<String>,
    }
}

error_record! {
    /// Reading or decoding the file failed.
    #[error("failed to read '{path}': {message}")]
    FileReadError => FileRead {
        path: String,
        message: String,
    }
}

error_record! {
    /// Writing the file failed.
    #[error("failed to write '{path}': {message}")]
    FileWriteError => FileWrite {
        path: String,
        message: String,
    }
}

error_record! {
    /// A workbook has no sheet with the requested name.
    #[error("sheet '{sheet}' not found (available: {available:?})")]
    SheetNotFoundError => SheetNotFound {
        sheet: String,
        available: Vec<String>,
    }
}

error_record! {
    /// The file's columns do not line up with the requested schema.
    #[error("schema mismatch in {location}: {message}")]
    SchemaMismatchError => SchemaMismatch {
        /// File path, sheet or record the mismatch was found in.
        location: String,
        message: String,
    }
}

error_record! {
    /// The file has no data at all.
    #[error("file is empty: {path}")]
    EmptyFileError => EmptyFile {
        path: String,
    }
}

error_union! {
    /// Everything [`crate::ingestion::ingest_from_path`] can fail with.
    FileError {
        FileNotFound(FileNotFoundError),
        PermissionDenied(PermissionDeniedError),
        UnsupportedFormat(UnsupportedFormatError),
        FileRead(FileReadError),
        FileWrite(FileWriteError),
        SheetNotFound(SheetNotFoundError),
        SchemaMismatch(SchemaMismatchError),
        EmptyFile(EmptyFileError),
        ValueParse(ValueParseError),
    }
}

impl FileError {
    /// Classify an I/O failure on `path`.
    pub fn from_io(path: &str, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => FileNotFoundError::new(path.to_string()).into(),
            std::io::ErrorKind::PermissionDenied => PermissionDeniedError::new(path.to_string()).into(),
            _ => FileReadError::new(path.to_string(), error.to_string()).into(),
        }
    }
}
