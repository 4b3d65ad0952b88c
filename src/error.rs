use crate::timing::TimingError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid graph document: {0}")]
    Document(#[from] json5::Error),
    #[error(transparent)]
    Timing(#[from] TimingError),
}

pub type Result<T> = std::result::Result<T, Error>;
