use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid race snapshot: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl From<ValidationErrors> for StorageError {
    fn from(errors: ValidationErrors) -> Self {
        StorageError::Validation(errors.to_string())
    }
}

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.kind() == sqlx::error::ErrorKind::UniqueViolation
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.kind() == sqlx::error::ErrorKind::ForeignKeyViolation
        )
    }

    /// A malformed snapshot. Retrying the same payload cannot succeed.
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }

    /// Folds driver-level constraint failures into `ConstraintViolation` so callers
    /// can tell a conflicting payload apart from an unreachable database.
    pub(crate) fn classify(self) -> Self {
        let violation = match &self {
            StorageError::Database(sqlx::Error::Database(e))
                if self.is_unique_violation()
                    || self.is_foreign_key_violation()
                    || e.kind() == sqlx::error::ErrorKind::CheckViolation =>
            {
                Some(e.message().to_string())
            }
            _ => None,
        };

        match violation {
            Some(message) => StorageError::ConstraintViolation(message),
            None => self,
        }
    }
}
