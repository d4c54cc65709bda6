use thiserror::Error;
use vowcard_shared::store::StoreError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored content could not be read: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
