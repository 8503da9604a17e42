use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no downloadable package matches the current platform [{os}, {arch}]")]
    UnsupportedPackage { os: String, arch: String },

    #[error("failed to parse release metadata: {0}")]
    Metadata(#[source] serde_json::Error),

    #[error("failed to create temporary download file: {0}")]
    TempFile(#[source] io::Error),

    #[error("download did not complete successfully")]
    Download,

    #[error("transfer failed: {0}")]
    Transfer(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Io(#[from] io::Error),
}
