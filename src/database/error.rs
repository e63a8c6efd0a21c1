use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to access member store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize member rows: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Invalid member row '{name}': {reason}")]
    InvalidRow { name: String, reason: String },

    #[error("Member store rejected the write: {0}")]
    WriteRejected(String)
}
