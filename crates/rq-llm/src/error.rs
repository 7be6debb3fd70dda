use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("missing credentials: environment variable {var} is not set")]
    MissingCredentials { var: String },
    #[error("invalid provider configuration: {0}")]
    Configuration(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timed out")]
    Timeout,
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
