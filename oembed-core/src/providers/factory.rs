use std::sync::Arc;

use crate::config::schema::Config;
use crate::error::Result;
use crate::providers::cache::MemoryCache;
use crate::providers::http_client::Fetcher;
use crate::providers::library::bootstrap_basic;
use crate::providers::provider::ProviderSettings;
use crate::providers::registry::ProviderRegistry;
use crate::providers::schema::bootstrap_schema;

/// Builds a registry from configuration. Sources register in this order, so
/// later ones take precedence: built-in table, remote schemas, configured providers.
pub async fn create_provider_registry(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
) -> Result<ProviderRegistry> {
    let settings = ProviderSettings::from_http_config(&config.http, fetcher);
    let mut registry = ProviderRegistry::new();

    if config.cache.enabled {
        registry.set_cache(Some(Arc::new(MemoryCache::new())));
    }

    if config.bootstrap.basic {
        bootstrap_basic(&mut registry, &settings)?;
    }

    for source in &config.bootstrap.schemas {
        bootstrap_schema(&mut registry, source.kind, &settings, &source.params).await?;
    }

    for provider in &config.providers {
        let instance = Arc::new(
            settings.build(provider.endpoint.trim()).with_params(
                provider
                    .params
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            ),
        );
        for pattern in &provider.patterns {
            registry.register(pattern.clone(), instance.clone())?;
        }
    }

    tracing::debug!(
        patterns = registry.len(),
        cached = registry.cache().is_some(),
        "provider registry ready"
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    use super::create_provider_registry;
    use crate::config::schema::{Config, ProviderConfig};
    use crate::providers::testing::ScriptedFetcher;
    use crate::providers::types::Params;

    #[tokio::test]
    async fn configured_providers_override_library() {
        let fetcher = Arc::new(ScriptedFetcher::json(r#"{"type": "video"}"#));
        let mut config = Config::default();
        config.http.timeout_ms = 750;
        config.http.user_agent = "configured/1.0".to_owned();
        config.cache.enabled = true;
        config.providers.push(ProviderConfig {
            endpoint: "https://proxy.example/oembed".to_owned(),
            patterns: vec![r"https?://vimeo\.com/\S+".to_owned()],
            params: BTreeMap::from([("maxwidth".to_owned(), "480".to_owned())]),
        });

        let registry = create_provider_registry(&config, fetcher.clone())
            .await
            .expect("registry");

        let provider = registry
            .provider_for_url("https://vimeo.com/1")
            .expect("match");
        assert_eq!(provider.endpoint(), "https://proxy.example/oembed");
        assert_eq!(provider.timeout(), Duration::from_millis(750));
        assert_eq!(provider.user_agent(), "configured/1.0");
        assert!(registry.cache().is_some());

        registry
            .request("https://vimeo.com/1", &Params::new())
            .await
            .expect("first");
        registry
            .request("https://vimeo.com/1", &Params::new())
            .await
            .expect("second");
        assert_eq!(fetcher.calls(), 1);
        assert!(fetcher.requests()[0].url.contains("maxwidth=480"));
    }

    #[tokio::test]
    async fn basic_bootstrap_can_be_disabled() {
        let fetcher = Arc::new(ScriptedFetcher::json("{}"));
        let mut config = Config::default();
        config.bootstrap.basic = false;

        let registry = create_provider_registry(&config, fetcher)
            .await
            .expect("registry");

        assert!(registry.is_empty());
        assert!(registry.cache().is_none());
    }
}
