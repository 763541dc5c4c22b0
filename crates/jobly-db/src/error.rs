//! Errors raised by the data-access layer.

use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

/// Everything a record-access call can fail with.
///
/// Constraint failures reported by PostgreSQL are classified by SQLSTATE in
/// [`DbError::from_db_error`] so callers can tell bad input from outages.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any driver error that is not a recognised constraint failure.
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// No row matched the key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected before any statement was sent (e.g. an empty update).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SQLSTATE 23505.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// SQLSTATE 23503, such as a job naming a company that does not exist.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// SQLSTATE 23514, such as equity above 1.
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// The pool could not hand out a connection.
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl DbError {
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Classify a driver error, keeping the constraint name in the message.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let Some(db_err) = err.as_db_error() else {
            return Self::Query(err);
        };
        let detail = format!(
            "{}: {}",
            db_err.constraint().unwrap_or("unknown"),
            db_err.message()
        );
        let code = db_err.code().clone();
        match code.code() {
            "23505" => Self::UniqueViolation(detail),
            "23503" => Self::ForeignKeyViolation(detail),
            "23514" => Self::CheckViolation(detail),
            _ => Self::Query(err),
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
