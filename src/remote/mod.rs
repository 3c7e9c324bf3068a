// Remote data module.
// Client, endpoints, payload decoding and the never-failing tab fetcher.

pub mod client;
pub mod endpoints;
pub mod fetcher;
pub mod payload;

pub use client::{DEFAULT_BASE_URL, RemoteClient};
pub use fetcher::{DataFetcher, HttpFetcher};
pub use payload::{CanonicalResult, Record};
