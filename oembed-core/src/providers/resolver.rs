use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::cache::{cache_key, EmbedCache};
use crate::providers::types::{EmbedResult, Params};

#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, url: &str, params: &Params) -> Result<EmbedResult>;
}

#[async_trait]
impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    async fn resolve(&self, url: &str, params: &Params) -> Result<EmbedResult> {
        self.as_ref().resolve(url, params).await
    }
}

/// Memoizes a resolver's successful results in an [`EmbedCache`].
pub struct CachingResolver<R> {
    inner: R,
    cache: Arc<dyn EmbedCache>,
}

impl<R: Resolver> CachingResolver<R> {
    pub fn new(inner: R, cache: Arc<dyn EmbedCache>) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn cache(&self) -> &Arc<dyn EmbedCache> {
        &self.cache
    }
}

#[async_trait]
impl<R: Resolver> Resolver for CachingResolver<R> {
    async fn resolve(&self, url: &str, params: &Params) -> Result<EmbedResult> {
        resolve_through_cache(&self.inner, self.cache.as_ref(), url, params).await
    }
}

/// Cache lookup, then `resolver` on a miss. Only successful results are stored.
pub async fn resolve_through_cache<R: Resolver + ?Sized>(
    resolver: &R,
    cache: &dyn EmbedCache,
    url: &str,
    params: &Params,
) -> Result<EmbedResult> {
    let key = cache_key(url, params);

    match cache.get(&key) {
        Ok(Some(hit)) => {
            tracing::debug!(url, key = %key, "embed cache hit");
            return Ok(hit);
        }
        Ok(None) => tracing::debug!(url, key = %key, "embed cache miss"),
        Err(err) => {
            tracing::warn!(url, key = %key, error = %err, "embed cache lookup failed; treating as miss");
        }
    }

    let result = resolver.resolve(url, params).await?;
    if let Err(err) = cache.set(&key, result.clone()) {
        tracing::warn!(url, key = %key, error = %err, "failed to store embed result in cache");
    }
    Ok(result)
}
