// sidedish: fetch-or-cache HTTP client core.
// Memoizes response bytes by endpoint URL and decodes JSON into typed models.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;

pub use cache::{BoundedStore, CacheStore, MemoryStore};
pub use client::{
    ContentType, Decoder, Endpoint, Envelope, FetchClient, FetchSource, HttpMethod, HttpTransport,
    JsonDecoder, RequestDescriptor, Transport,
};
pub use config::ClientConfig;
pub use error::{FetchError, Result};
