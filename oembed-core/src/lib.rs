pub mod config;
pub mod error;
pub mod logging;
pub mod providers;

pub use config::Config;
pub use error::{Error, Result};
pub use providers::{
    create_provider_registry, CachingResolver, EmbedCache, EmbedResult, Fetcher, HttpFetcher,
    MemoryCache, Params, Provider, ProviderRegistry, Resolver,
};
