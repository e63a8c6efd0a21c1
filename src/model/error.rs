use thiserror::Error;

use crate::database::error::PersistenceError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Unknown rank '{0}'")]
    UnknownRank(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Member '{0}' already exists")]
    DuplicateMember(String),

    #[error("Member '{0}' not found")]
    UnknownMember(String),

    #[error("Member name must not be empty")]
    EmptyMemberName,

    #[error(transparent)]
    Persistence(#[from] PersistenceError)
}

impl TrackerError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        TrackerError::InvalidConfiguration(message.into())
    }
}
