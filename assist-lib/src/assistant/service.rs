use std::time::Duration;

/// failures of the optional remote capabilities: translation, speech and
/// topic lookup
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    Unavailable(&'static str),

    #[error("service request failed")]
    Request(#[from] reqwest::Error),

    #[error("service responded with status {0}")]
    Status(u16),

    #[error("invalid service endpoint")]
    InvalidEndpoint(#[from] url::ParseError),
}

pub(crate) fn client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .build()?)
}

/// the parsed endpoint, refusing urls that cannot take a path
pub(crate) fn endpoint(given: &str) -> Result<url::Url, ServiceError> {
    let url = url::Url::parse(given)?;

    if url.cannot_be_a_base() {
        return Err(ServiceError::InvalidEndpoint(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }

    Ok(url)
}
