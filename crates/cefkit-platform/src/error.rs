use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("cannot detect the current platform, is it supported? [{os:?}, {arch:?}]")]
    Unsupported {
        os: Option<String>,
        arch: Option<String>,
    },
}
