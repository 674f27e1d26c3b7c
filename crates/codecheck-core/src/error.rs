use codecheck_api::ApiError;
use thiserror::Error;

/// Things that go wrong outside of a search request itself
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
