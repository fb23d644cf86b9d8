//! Errors for the file-facing surface. Rendering itself never fails.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid page index: {0}")]
    PageIndex(#[from] serde_json::Error),

    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("page already exists: {0}")]
    PageExists(String),

    #[error("invalid page name: {0:?}")]
    InvalidPageName(String),

    #[error("unsupported page extension: {0}")]
    UnsupportedExtension(String),
}

pub type Result<T> = std::result::Result<T, Error>;
