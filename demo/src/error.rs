#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid node: {0}")]
    InvalidNode(String),
    #[error("Request failed with status {0}")]
    ErrorStatus(u16),
    #[error(transparent)]
    Http(#[from] http_intercept::Error),
}
