use std::time::Duration;

use async_trait::async_trait;
use lib::api::server::{Host, ServiceHosts};
use reqwest::header::ACCEPT;

use super::{BasicAuth, GroupTransport, HttpResponse, TransportError};

const CONTENT_TYPE_PROTOBUF: &str = "application/x-protobuf";

/// [`GroupTransport`] over HTTPS. The "authenticated channel" is a request
/// to the chat host carrying the account's own Basic credentials.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    hosts: ServiceHosts,
    account_auth: BasicAuth,
}

impl ReqwestTransport {
    pub fn new(
        hosts: ServiceHosts,
        account_auth: BasicAuth,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            hosts,
            account_auth,
        })
    }

    async fn get(
        &self,
        host: Host,
        path: &str,
        auth: &BasicAuth,
    ) -> Result<HttpResponse, TransportError> {
        let url = url::Url::parse(&self.hosts.https_url(host, path)).map_err(|e| {
            log::error!("Error parsing {host:?} path {path:?} into Url type: {e:?}");

            TransportError::InvalidUrl
        })?;

        let mut request = self
            .client
            .get(url)
            .basic_auth(&auth.username, Some(&auth.password));
        if host == Host::Storage {
            request = request.header(ACCEPT, CONTENT_TYPE_PROTOBUF);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        log::debug!("GET {host:?}{path} -> {status} ({} bytes)", body.len());

        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::CouldNotConnect(error.to_string())
    } else {
        TransportError::Http(error)
    }
}

#[async_trait]
impl GroupTransport for ReqwestTransport {
    async fn request_authenticated(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.get(Host::Chat, path, &self.account_auth).await
    }

    async fn request_http(
        &self,
        host: Host,
        path: &str,
        auth: &BasicAuth,
    ) -> Result<HttpResponse, TransportError> {
        self.get(host, path, auth).await
    }
}
