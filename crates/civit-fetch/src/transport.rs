use std::io::Read;
use std::time::Duration;

use reqwest::Url;

use crate::FetchError;

/// An open response body ready to be streamed.
pub struct RemoteFile {
    /// Value of `content-length`, if the server sent one
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

/// Opens a streaming GET for a URL.
///
/// Implementations must fail with [`FetchError::Status`] on a non-2xx
/// status rather than hand back an error page as the body.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<RemoteFile, FetchError>;
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// `timeout` of `None` disables the client's default 30 second limit.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("civit-fetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                FetchError::Transport(format!("Failed to create HTTP client: {}", e.without_url()))
            })?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<RemoteFile, FetchError> {
        // reqwest errors carry the full URL, token included
        let response = self.client.get(url.clone()).send().map_err(|e| {
            FetchError::Transport(format!("Failed to start download: {}", e.without_url()))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(RemoteFile {
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}

/// Describe a body read failure without leaking the request URL.
pub(crate) fn describe_read_error(err: std::io::Error) -> String {
    let kind = err.kind();
    match err.into_inner() {
        Some(inner) => match inner.downcast::<reqwest::Error>() {
            Ok(http_err) => (*http_err).without_url().to_string(),
            Err(other) => other.to_string(),
        },
        None => std::io::Error::from(kind).to_string(),
    }
}
