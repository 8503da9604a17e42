pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("engine startup reported failure")]
    Startup,

    #[error("no engine instance available after startup")]
    InstanceUnavailable,
}
