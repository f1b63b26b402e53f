use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::providers::cache::EmbedCache;
use crate::providers::pattern::Pattern;
use crate::providers::provider::Provider;
use crate::providers::resolver::{resolve_through_cache, Resolver};
use crate::providers::types::{EmbedResult, Params};

/// Ordered pattern to provider table.
///
/// Lookups walk the table from the most recently registered pattern backwards,
/// so a later registration overrides an earlier overlapping one. Reads take
/// `&self` and are safe to share; `register` and `unregister` take `&mut self`
/// and are expected to happen during setup.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<(Pattern, Arc<Provider>)>,
    cache: Option<Arc<dyn EmbedCache>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, cache: Arc<dyn EmbedCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn set_cache(&mut self, cache: Option<Arc<dyn EmbedCache>>) {
        self.cache = cache;
    }

    pub fn cache(&self) -> Option<&Arc<dyn EmbedCache>> {
        self.cache.as_ref()
    }

    /// Maps `pattern` to `provider`. An existing pattern keeps its position and
    /// only has its provider replaced.
    pub fn register(&mut self, pattern: impl Into<String>, provider: Arc<Provider>) -> Result<()> {
        let pattern = pattern.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == pattern)
        {
            entry.1 = provider;
            return Ok(());
        }

        self.entries.push((Pattern::new(pattern)?, provider));
        Ok(())
    }

    pub fn unregister(&mut self, pattern: &str) -> Result<Arc<Provider>> {
        let index = self
            .entries
            .iter()
            .position(|(existing, _)| existing.as_str() == pattern)
            .ok_or_else(|| Error::KeyNotFound(pattern.to_owned()))?;
        Ok(self.entries.remove(index).1)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.entries
            .iter()
            .any(|(existing, _)| existing.as_str() == pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered patterns in lookup order, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Provider>)> {
        self.entries
            .iter()
            .rev()
            .map(|(pattern, provider)| (pattern.as_str(), provider))
    }

    pub fn provider_for_url(&self, url: &str) -> Option<&Arc<Provider>> {
        let (pattern, provider) = self
            .entries
            .iter()
            .rev()
            .find(|(pattern, _)| pattern.matches(url))?;
        tracing::debug!(
            url,
            pattern = pattern.as_str(),
            endpoint = provider.endpoint(),
            "matched oembed provider"
        );
        Some(provider)
    }

    /// Resolves `url`, going through the configured cache when there is one.
    pub async fn request(&self, url: &str, params: &Params) -> Result<EmbedResult> {
        match &self.cache {
            Some(cache) => resolve_through_cache(self, cache.as_ref(), url, params).await,
            None => self.resolve(url, params).await,
        }
    }
}

/// Resolution without the registry's cache.
#[async_trait]
impl Resolver for ProviderRegistry {
    async fn resolve(&self, url: &str, params: &Params) -> Result<EmbedResult> {
        let provider = self
            .provider_for_url(url)
            .ok_or_else(|| Error::ProviderNotFound(url.to_owned()))?;
        provider.request(url, params).await
    }
}
