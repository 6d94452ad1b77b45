// Request descriptors.
// Describes one request by method, content type, and endpoint URL.

use std::fmt;

use url::Url;

use crate::error::{FetchError, Result};

/// HTTP verb for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Media type sent in the `Content-Type` and `Accept` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Json,
    Text,
    Binary,
    Image,
}

impl ContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Text => "text/plain",
            ContentType::Binary => "application/octet-stream",
            ContentType::Image => "image/*",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Absolute URL of a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parse an absolute URL.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(Self { url })
    }

    /// Join a path onto a base URL.
    ///
    /// A leading slash in `path` replaces the base path, following URL
    /// reference resolution.
    pub fn join(base: &Url, path: &str) -> Result<Self> {
        let url = base
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{} + {}: {}", base, path, e)))?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL string used as the cache key.
    pub fn url_string(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Immutable description of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    content_type: ContentType,
    endpoint: Endpoint,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, content_type: ContentType, endpoint: Endpoint) -> Self {
        Self {
            method,
            content_type,
            endpoint,
        }
    }

    /// GET request for JSON.
    pub fn get_json(endpoint: Endpoint) -> Self {
        Self::new(HttpMethod::Get, ContentType::Json, endpoint)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Cache key for this request: the endpoint URL string.
    pub fn cache_key(&self) -> &str {
        self.endpoint.url_string()
    }
}
