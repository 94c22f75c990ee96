use crate::args::Cli;
use crate::output;
use anyhow::{bail, Context};
use pricewatch_browser::BrowserEngine;
use pricewatch_core::AppConfig;
use pricewatch_scanner::{FilterQuery, ScanOrchestrator};
use pricewatch_source::{
    SelectorAdapter, SourceAdapter, SourceDefinition, SourceLoader, SourceRegistry,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Load configuration: file, then `PRICEWATCH_*` variables, then flags.
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load config")?,
    };

    config.apply_env_overrides();
    cli.apply_to(&mut config);
    config.validate()?;

    Ok(config)
}

/// Run one search end to end and print the table.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    // Bad terms must fail before a browser is started.
    let query = FilterQuery::new(&cli.product, &cli.exclude, &cli.include, cli.match_mode())?;

    let loader = match &config.sources.definitions_dir {
        Some(dir) => SourceLoader::new(dir)?,
        None => SourceLoader::with_default_dir()?,
    };
    let registry = SourceRegistry::load_from(&loader)?;
    let definitions = registry.select(&config.sources.enabled)?;

    if definitions.is_empty() {
        bail!(
            "no source definitions found in {}",
            loader.definitions_dir().display()
        );
    }

    let engine = BrowserEngine::launch(&config.browser)
        .await
        .context("failed to launch browser")?;

    let adapters = match build_adapters(&engine, definitions).await {
        Ok(adapters) => adapters,
        Err(e) => {
            close_browser(engine).await;
            return Err(e);
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; keeping listings from sources that already answered");
            on_interrupt.cancel();
        }
    });

    let orchestrator = ScanOrchestrator::with_config(adapters, &config.scanning);
    let result = orchestrator.scan_with_cancel(&query, cancel).await;
    drop(orchestrator);

    close_browser(engine).await;

    print!("{}", output::render_table(result.records()));
    println!("{}", output::summary(&result));

    if let Some(path) = &cli.output {
        output::write_json(path, &result)?;
        info!(path = %path.display(), "wrote results");
    }

    Ok(())
}

/// One browser tab and one adapter per definition.
async fn build_adapters(
    engine: &BrowserEngine,
    definitions: Vec<SourceDefinition>,
) -> anyhow::Result<Vec<Arc<dyn SourceAdapter>>> {
    let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::with_capacity(definitions.len());

    for definition in definitions {
        let id = definition.id().clone();
        let session = engine
            .new_session()
            .await
            .with_context(|| format!("failed to open a browser tab for {id}"))?;
        let adapter = SelectorAdapter::new(definition, session, engine.wait_timeout())
            .with_context(|| format!("invalid source definition {id}"))?;
        adapters.push(Arc::new(adapter));
    }

    Ok(adapters)
}

async fn close_browser(engine: BrowserEngine) {
    if let Err(e) = engine.close().await {
        warn!(error = %e, "failed to close browser");
    }
}
