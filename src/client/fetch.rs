// Fetch-or-cache client.
// Serves requests from the cache when possible and writes every transport success back to it.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::{CacheStore, MemoryStore};
use crate::error::Result;

use super::decoder::{Decoder, JsonDecoder};
use super::descriptor::RequestDescriptor;
use super::transport::Transport;

/// Where the bytes of a fetch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

impl FetchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::Cache => "cache",
            FetchSource::Network => "network",
        }
    }
}

/// Client that memoizes response bodies by endpoint URL.
///
/// A cache hit never touches the transport. A miss calls the transport once
/// and stores the bytes on success. Failed requests leave the cache as is.
pub struct FetchClient<T, S = MemoryStore, D = JsonDecoder> {
    transport: T,
    store: S,
    decoder: D,
}

impl<T: Transport> FetchClient<T> {
    /// Create a client with an empty unbounded cache and JSON decoding.
    pub fn new(transport: T) -> Self {
        Self::with_parts(transport, MemoryStore::new(), JsonDecoder)
    }
}

impl<T: Transport, S: CacheStore> FetchClient<T, S> {
    /// Create a client over an existing store with JSON decoding.
    pub fn with_store(transport: T, store: S) -> Self {
        Self::with_parts(transport, store, JsonDecoder)
    }
}

impl<T: Transport, S: CacheStore, D: Decoder> FetchClient<T, S, D> {
    pub fn with_parts(transport: T, store: S, decoder: D) -> Self {
        Self {
            transport,
            store,
            decoder,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cached bytes for a request, without touching the transport.
    pub fn cached(&self, descriptor: &RequestDescriptor) -> Option<Bytes> {
        self.store.get(descriptor.cache_key())
    }

    /// Fetch raw bytes, from the cache when present.
    pub async fn fetch_raw(&self, descriptor: &RequestDescriptor) -> Result<Bytes> {
        let (bytes, _) = self.fetch_raw_with_source(descriptor).await?;
        Ok(bytes)
    }

    /// Like [`fetch_raw`](Self::fetch_raw), also reporting whether the bytes
    /// were a cache hit.
    pub async fn fetch_raw_with_source(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<(Bytes, FetchSource)> {
        if let Some(bytes) = self.lookup(descriptor) {
            return Ok((bytes, FetchSource::Cache));
        }
        let bytes = self.fetch_and_store(descriptor).await?;
        Ok((bytes, FetchSource::Network))
    }

    /// Fetch and decode a typed value, from the cache when present.
    ///
    /// Bytes that fail to decode produce `FetchError::Decode`. They stay
    /// cached when they came from a successful transport call.
    pub async fn fetch_typed<M: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<M> {
        let bytes = match self.lookup(descriptor) {
            Some(bytes) => bytes,
            None => self.fetch_and_store(descriptor).await?,
        };
        self.decode(descriptor, &bytes)
    }

    /// Fetch raw bytes from the transport, skipping the cache read.
    ///
    /// On success the cached entry for this key is replaced.
    pub async fn fetch_fresh(&self, descriptor: &RequestDescriptor) -> Result<Bytes> {
        self.fetch_and_store(descriptor).await
    }

    fn lookup(&self, descriptor: &RequestDescriptor) -> Option<Bytes> {
        let key = descriptor.cache_key();
        let hit = self.store.get(key);
        match &hit {
            Some(bytes) => debug!(key, bytes = bytes.len(), "cache hit"),
            None => debug!(key, method = %descriptor.method(), "cache miss"),
        }
        hit
    }

    async fn fetch_and_store(&self, descriptor: &RequestDescriptor) -> Result<Bytes> {
        match self.transport.request(descriptor).await {
            Ok(bytes) => {
                self.write_back(descriptor, &bytes);
                Ok(bytes)
            }
            Err(e) => {
                warn!(key = descriptor.cache_key(), error = %e, "transport failed");
                Err(e)
            }
        }
    }

    /// Store a successful transport payload. Every fetch path funnels through here.
    fn write_back(&self, descriptor: &RequestDescriptor, bytes: &Bytes) {
        let key = descriptor.cache_key();
        self.store.put(key, bytes.clone());
        debug!(key, bytes = bytes.len(), "cached response");
    }

    fn decode<M: DeserializeOwned>(&self, descriptor: &RequestDescriptor, bytes: &[u8]) -> Result<M> {
        self.decoder.decode(bytes).inspect_err(|e| {
            warn!(key = descriptor.cache_key(), error = %e, "decode failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BoundedStore;
    use crate::client::descriptor::{ContentType, Endpoint, HttpMethod};
    use crate::error::FetchError;
    use serde::Deserialize;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport that replays scripted results and counts calls.
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<VecDeque<Result<Bytes>>>,
        calls: AtomicUsize,
    }

    impl MockTransport {
        fn replying(responses: Vec<Result<Bytes>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for MockTransport {
        async fn request(&self, _descriptor: &RequestDescriptor) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Network("no scripted response".to_string())))
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Dish {
        title: String,
        price: u32,
    }

    fn menu() -> RequestDescriptor {
        let endpoint = Endpoint::parse("https://api.example.com/menu").unwrap();
        RequestDescriptor::new(HttpMethod::Get, ContentType::Json, endpoint)
    }

    fn ok(body: &'static [u8]) -> Result<Bytes> {
        Ok(Bytes::from_static(body))
    }

    #[tokio::test]
    async fn test_miss_calls_transport_and_caches() {
        let client = FetchClient::new(MockTransport::replying(vec![ok(b"b1")]));

        let bytes = client.fetch_raw(&menu()).await.unwrap();

        assert_eq!(bytes, Bytes::from_static(b"b1"));
        assert_eq!(client.transport().calls(), 1);
        assert_eq!(
            client.store().get("https://api.example.com/menu"),
            Some(Bytes::from_static(b"b1"))
        );
    }

    #[tokio::test]
    async fn test_hit_skips_transport() {
        let store = MemoryStore::new();
        store.put("https://api.example.com/menu", Bytes::from_static(b"b1"));
        let client = FetchClient::with_store(MockTransport::default(), store);

        let bytes = client.fetch_raw(&menu()).await.unwrap();

        assert_eq!(bytes, Bytes::from_static(b"b1"));
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_repeated_fetch_is_idempotent() {
        let client = FetchClient::new(MockTransport::replying(vec![ok(b"b1"), ok(b"b2")]));

        let first = client.fetch_raw(&menu()).await.unwrap();
        let second = client.fetch_raw(&menu()).await.unwrap();
        let third = client.fetch_raw(&menu()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_verbatim() {
        let client = FetchClient::new(MockTransport::replying(vec![Err(FetchError::Network(
            "timeout".to_string(),
        ))]));

        let err = client.fetch_raw(&menu()).await.unwrap_err();

        assert!(matches!(err, FetchError::Network(msg) if msg == "timeout"));
        assert!(client.store().is_empty());
        assert!(client.cached(&menu()).is_none());
    }

    #[tokio::test]
    async fn test_failure_then_retry_by_caller() {
        let client = FetchClient::new(MockTransport::replying(vec![
            Err(FetchError::Network("timeout".to_string())),
            ok(b"b1"),
        ]));

        assert!(client.fetch_raw(&menu()).await.is_err());
        let bytes = client.fetch_raw(&menu()).await.unwrap();

        assert_eq!(bytes, Bytes::from_static(b"b1"));
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_typed_miss_decodes_and_caches_raw() {
        let body: &'static [u8] = br#"{"title":"Kimchi","price":3000}"#;
        let client = FetchClient::new(MockTransport::replying(vec![ok(body)]));

        let dish: Dish = client.fetch_typed(&menu()).await.unwrap();

        assert_eq!(dish.title, "Kimchi");
        assert_eq!(dish.price, 3000);
        assert_eq!(client.cached(&menu()), Some(Bytes::from_static(body)));
    }

    #[tokio::test]
    async fn test_typed_hit_decodes_without_transport() {
        let store = MemoryStore::new();
        store.put(
            "https://api.example.com/menu",
            Bytes::from_static(br#"{"title":"Japchae","price":5000}"#),
        );
        let client = FetchClient::with_store(MockTransport::default(), store);

        let dish: Dish = client.fetch_typed(&menu()).await.unwrap();

        assert_eq!(
            dish,
            Dish {
                title: "Japchae".to_string(),
                price: 5000
            }
        );
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_typed_malformed_body_is_decode_error() {
        let client = FetchClient::new(MockTransport::replying(vec![ok(b"<html>oops</html>")]));

        let err = client.fetch_typed::<Dish>(&menu()).await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(client.transport().calls(), 1);
        // Raw bytes are still cached since the transport succeeded.
        assert_eq!(
            client.cached(&menu()),
            Some(Bytes::from_static(b"<html>oops</html>"))
        );
    }

    #[tokio::test]
    async fn test_typed_hit_malformed_is_decode_error() {
        let store = MemoryStore::new();
        store.put("https://api.example.com/menu", Bytes::from_static(b"<html>"));
        let client = FetchClient::with_store(
            MockTransport::replying(vec![ok(br#"{"title":"Kimchi","price":3000}"#)]),
            store,
        );

        let err = client.fetch_typed::<Dish>(&menu()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(client.transport().calls(), 0);

        // The bad entry stays until a fresh fetch replaces it.
        let err = client.fetch_typed::<Dish>(&menu()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        client.fetch_fresh(&menu()).await.unwrap();
        let dish: Dish = client.fetch_typed(&menu()).await.unwrap();

        assert_eq!(dish.title, "Kimchi");
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_raw_with_source() {
        let client = FetchClient::new(MockTransport::replying(vec![ok(b"b1")]));

        let (first, source) = client.fetch_raw_with_source(&menu()).await.unwrap();
        assert_eq!(first, Bytes::from_static(b"b1"));
        assert_eq!(source, FetchSource::Network);

        let (second, source) = client.fetch_raw_with_source(&menu()).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(source, FetchSource::Cache);
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_typed_transport_failure() {
        let client = FetchClient::new(MockTransport::replying(vec![Err(FetchError::Status {
            status: 500,
            url: "https://api.example.com/menu".to_string(),
        })]));

        let err = client.fetch_typed::<Dish>(&menu()).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert!(client.store().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_fresh_overwrites_entry() {
        let client = FetchClient::new(MockTransport::replying(vec![ok(b"b1"), ok(b"b2")]));

        client.fetch_raw(&menu()).await.unwrap();
        let fresh = client.fetch_fresh(&menu()).await.unwrap();
        let cached = client.fetch_raw(&menu()).await.unwrap();

        assert_eq!(fresh, Bytes::from_static(b"b2"));
        assert_eq!(cached, Bytes::from_static(b"b2"));
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_fresh_failure_keeps_old_entry() {
        let client = FetchClient::new(MockTransport::replying(vec![
            ok(b"b1"),
            Err(FetchError::Network("offline".to_string())),
        ]));

        client.fetch_raw(&menu()).await.unwrap();
        assert!(client.fetch_fresh(&menu()).await.is_err());

        assert_eq!(client.cached(&menu()), Some(Bytes::from_static(b"b1")));
    }

    #[tokio::test]
    async fn test_distinct_endpoints_cached_separately() {
        let client = FetchClient::new(MockTransport::replying(vec![ok(b"main"), ok(b"soup")]));
        let soup = RequestDescriptor::get_json(Endpoint::parse("https://api.example.com/soup").unwrap());

        assert_eq!(client.fetch_raw(&menu()).await.unwrap(), Bytes::from_static(b"main"));
        assert_eq!(client.fetch_raw(&soup).await.unwrap(), Bytes::from_static(b"soup"));
        assert_eq!(client.store().len(), 2);
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_bounded_store_client() {
        let client = FetchClient::with_store(
            MockTransport::replying(vec![ok(b"b1")]),
            BoundedStore::new(8),
        );

        client.fetch_raw(&menu()).await.unwrap();
        let bytes = client.fetch_raw(&menu()).await.unwrap();

        assert_eq!(bytes, Bytes::from_static(b"b1"));
        assert_eq!(client.transport().calls(), 1);
    }
}
