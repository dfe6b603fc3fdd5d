use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
