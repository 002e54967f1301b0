use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("can't {action} by field {field}")]
    FieldNotAllowed { action: &'static str, field: String },

    #[error("unknown sort direction {0}")]
    UnknownDirection(String),

    #[error("page number and size must be greater than 0")]
    InvalidPaging,
}
