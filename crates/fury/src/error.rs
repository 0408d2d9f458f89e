//! Error types for fury

use thiserror::Error;

/// Result type alias for fury operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for query building and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// The destination is not a record, or a record type declares no fields
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Neither an explicit table nor a model name is available
    #[error("Unspecified table: no table name given and no model to derive one from")]
    UnspecifiedTable,

    /// A WHERE condition that cannot be rendered
    #[error("Unsupported condition: {0}")]
    UnsupportedCondition(String),

    /// A logical expression operand that cannot be rendered
    #[error("Unsupported operand: {0}")]
    UnsupportedOperand(String),

    /// An expression is missing its column or its value
    #[error("Missing operand in expression: {0}")]
    MissingOperand(String),

    /// A write statement would have no columns
    #[error("Empty column set for model '{0}'")]
    EmptyColumnSet(String),

    /// A DELETE with no condition was refused
    #[error("Refusing to DELETE from '{0}' without a condition")]
    UnfilteredDelete(String),

    /// LIMIT or OFFSET was negative
    #[error("Negative {clause}: {value}")]
    NegativeLimitOrOffset { clause: &'static str, value: i64 },

    /// Internal consistency check between columns, placeholders and arguments
    #[error("Column/argument mismatch: {0}")]
    ColumnArgumentMismatch(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a column/argument mismatch error
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::ColumnArgumentMismatch(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error was raised while building SQL (before touching the database)
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidShape(_)
                | Self::UnspecifiedTable
                | Self::UnsupportedCondition(_)
                | Self::UnsupportedOperand(_)
                | Self::MissingOperand(_)
                | Self::EmptyColumnSet(_)
                | Self::UnfilteredDelete(_)
                | Self::NegativeLimitOrOffset { .. }
                | Self::ColumnArgumentMismatch(_)
        )
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
