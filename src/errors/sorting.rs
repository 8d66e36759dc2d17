//! Sorting errors (codes `3000-3999`).

use super::validation::{ColumnNotFoundError, MissingParameterError};

error_record! {
    /// A column's values have no total order.
    #[error("column '{column}' cannot be sorted: {reason}")]
    NotSortableError => NotSortable {
        column: String,
        reason: String,
    }
}

error_record! {
    /// A column mixes value types, so rows cannot be compared.
    #[error("column '{column}' mixes value types {types:?}")]
    MixedTypesError => MixedTypes {
        column: String,
        types: Vec<String>,
    }
}

error_record! {
    /// A sort direction string was not recognised.
    #[error("invalid sort order '{order}' (expected 'asc' or 'desc')")]
    InvalidSortOrderError => InvalidSortOrder {
        order: String,
    }
}

error_union! {
    /// Everything [`crate::processing::sort_by`] can fail with.
    SortError {
        ColumnNotFound(ColumnNotFoundError),
        MissingParameter(MissingParameterError),
        NotSortable(NotSortableError),
        MixedTypes(MixedTypesError),
        InvalidSortOrder(InvalidSortOrderError),
    }
}
