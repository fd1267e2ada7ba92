use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i32 },
    #[error("{kind} not found for {field}: {value}")]
    NotFoundBy {
        kind: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{0}")]
    BusinessRule(String),
    #[error("duplicate {field}: {value}")]
    Conflict { field: &'static str, value: String },
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("Connection pool error: {0}")]
    ConnectionPoolError(#[from] diesel::r2d2::PoolError),
    #[error("Migration error: {0}")]
    MigrationError(String),
}
