// Transport layer.
// Performs the network exchange for a request descriptor and returns the body bytes.

use std::future::Future;

use bytes::Bytes;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::config::ClientConfig;
use crate::error::{FetchError, Result};

use super::descriptor::RequestDescriptor;

/// Performs one request per call and resolves exactly once.
pub trait Transport: Send + Sync {
    fn request(&self, descriptor: &RequestDescriptor) -> impl Future<Output = Result<Bytes>> + Send;
}

/// HTTP transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with default headers from the config.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::Config(format!("invalid user agent: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Check response status and convert errors.
    fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        match status {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(url)),
            status => Err(FetchError::Status {
                status: status.as_u16(),
                url,
            }),
        }
    }
}

impl Transport for HttpTransport {
    async fn request(&self, descriptor: &RequestDescriptor) -> Result<Bytes> {
        let mime = descriptor.content_type().mime();
        let response = self
            .client
            .request(descriptor.method().into(), descriptor.endpoint().url().clone())
            .header(ACCEPT, mime)
            .header(CONTENT_TYPE, mime)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let response = Self::check_response(response)?;
        let body = response.bytes().await.map_err(FetchError::Transport)?;
        Ok(body)
    }
}
