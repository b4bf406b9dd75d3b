use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordKeyError {
    #[error("Empty record key")]
    Empty,

    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("Record key has no user id: {0}")]
    MissingUser(String),

    #[error("Record key has no entity id: {0}")]
    MissingEntityId(String),

    #[error("Balance keys take no entity id: {0}")]
    UnexpectedEntityId(String),
}

pub type RecordKeyResult<T> = Result<T, RecordKeyError>;
