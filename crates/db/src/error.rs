use thiserror::Error;

/// Errors raised by store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("unique constraint failed on {table} ({})", .fields.join(", "))]
    ConstraintViolation {
        table: &'static str,
        fields: Vec<String>,
    },

    #[error("record {id} not found in {table}")]
    RecordNotFound { table: &'static str, id: i64 },

    /// The query references something the store cannot evaluate.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
