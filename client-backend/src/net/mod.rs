//! The transport seam. The group logic only sees [`GroupTransport`]; what
//! carries the bytes (HTTPS here, a websocket elsewhere) is up to the
//! implementation.
use async_trait::async_trait;
use lib::api::server::Host;

pub mod http;

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("The request timed out")]
    Timeout,
    #[error("Could not reach the server: {0}")]
    CouldNotConnect(String),
    #[error("This URL is invalid")]
    InvalidUrl,
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Credentials for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait GroupTransport: Send + Sync {
    /// `GET path` over the account's already-authenticated channel to the
    /// chat service.
    async fn request_authenticated(&self, path: &str) -> Result<HttpResponse, TransportError>;

    /// `GET path` against `host`, authenticated with `auth`.
    async fn request_http(
        &self,
        host: Host,
        path: &str,
        auth: &BasicAuth,
    ) -> Result<HttpResponse, TransportError>;
}
