pub mod cache;
pub mod factory;
pub mod http_client;
pub mod library;
pub mod pattern;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod schema;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use cache::{cache_key, EmbedCache, MemoryCache};
pub use factory::create_provider_registry;
pub use http_client::{FetchResponse, Fetcher, HttpFetcher, TransportFailure};
pub use provider::{Provider, ProviderSettings};
pub use registry::ProviderRegistry;
pub use resolver::{CachingResolver, Resolver};
pub use types::{EmbedResult, Params};
