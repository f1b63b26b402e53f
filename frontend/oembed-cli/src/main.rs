mod cli;
mod renderer;

use std::path::PathBuf;
use std::sync::Arc;

use oembed_core::{Error, HttpFetcher, Params, ProviderRegistry};

use crate::renderer::Renderer;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("oembed failed: {error}");
            std::process::exit(1);
        }
    }
}

/// Returns whether every requested URL was handled successfully.
fn run() -> oembed_core::Result<bool> {
    let args = cli::Cli::parse_args();
    oembed_core::logging::init_tracing(&args.log_level);

    let config_path = args.config.as_ref().map(PathBuf::from);
    let config = oembed_core::config::load(config_path.as_deref())?;
    oembed_core::config::validate_config(&config)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| Error::Config(format!("failed to create tokio runtime: {err}")))?;

    runtime.block_on(async move {
        let fetcher = Arc::new(HttpFetcher::new()?);
        let registry = oembed_core::create_provider_registry(&config, fetcher).await?;
        execute(&registry, args.command).await
    })
}

async fn execute(registry: &ProviderRegistry, command: cli::Command) -> oembed_core::Result<bool> {
    match command {
        cli::Command::Resolve {
            urls,
            params,
            output,
        } => {
            let params: Params = params.into_iter().collect();
            let renderer = Renderer::new(output);

            // Independent requests share the registry read-only.
            let outcomes = futures::future::join_all(
                urls.iter().map(|url| registry.request(url, &params)),
            )
            .await;

            let mut all_ok = true;
            for (url, outcome) in urls.iter().zip(outcomes) {
                match outcome {
                    Ok(result) => renderer.render_result(url, &result),
                    Err(error) => {
                        tracing::debug!(url, error = %error, "resolution failed");
                        renderer.render_error(url, &error);
                        all_ok = false;
                    }
                }
            }
            Ok(all_ok)
        }
        cli::Command::Match { url } => match registry.provider_for_url(&url) {
            Some(provider) => {
                println!("{}", provider.endpoint());
                Ok(true)
            }
            None => Err(Error::ProviderNotFound(url)),
        },
        cli::Command::Providers => {
            for (pattern, provider) in registry.iter() {
                println!("{pattern}\t{}", provider.endpoint());
            }
            Ok(true)
        }
    }
}
