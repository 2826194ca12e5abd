use thiserror::Error;

pub type ViewportResult<T> = Result<T, ViewportError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewportError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("scroll container not found: {0}")]
    ContainerNotFound(String),

    #[error("scroll target not found: {0}")]
    TargetNotFound(String),
}
