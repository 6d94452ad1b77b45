// Fetch client module.
// Provides request descriptors, the transport and decoder seams, and the caching client.

pub mod decoder;
pub mod descriptor;
pub mod fetch;
pub mod transport;

pub use decoder::{Decoder, Envelope, JsonDecoder};
pub use descriptor::{ContentType, Endpoint, HttpMethod, RequestDescriptor};
pub use fetch::{FetchClient, FetchSource};
pub use transport::{HttpTransport, Transport};
