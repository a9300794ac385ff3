use anyhow::{bail, Context, Result};
use leadscan_browser::BrowserEngine;
use leadscan_core::AppConfig;
use leadscan_extractor::{
    ChannelReporter, ExtractionEvent, ExtractionReport, Extractor, TracingReporter,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::ConfigAction;

/// Load configuration from `path` or the default location, then apply
/// environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load config")?,
    };
    config.apply_env();
    Ok(config)
}

pub struct ExtractArgs {
    pub url: String,
    pub concurrency: Option<usize>,
    pub output: Option<PathBuf>,
    pub headed: bool,
    pub events: bool,
}

pub async fn extract(mut config: AppConfig, args: ExtractArgs) -> Result<()> {
    if let Some(concurrency) = args.concurrency {
        config.extraction.concurrency = concurrency;
    }
    if args.headed {
        config.browser.headless = false;
    }
    let prepared = Extractor::prepare(&config).context("invalid configuration")?;

    let engine = BrowserEngine::launch(&config.browser)
        .await
        .context("failed to launch browser")?;
    let extractor = prepared.with_factory(engine);

    let outcome = if args.events {
        extract_with_events(&extractor, &args.url).await
    } else {
        extractor
            .extract(&args.url, &TracingReporter)
            .await
            .map_err(anyhow::Error::from)
    };

    if let Err(e) = extractor.into_factory().shutdown().await {
        tracing::warn!("Browser did not shut down cleanly: {}", e);
    }
    let results = outcome.context("extraction failed")?;

    info!("{}", ExtractionReport::summarize(&results));
    if !args.events {
        write_json(&results, args.output.as_deref())?;
    } else if let Some(path) = args.output.as_deref() {
        write_json(&results, Some(path))?;
    }
    Ok(())
}

/// Stream progress as JSON lines on stdout, ending with a result or error event.
async fn extract_with_events(
    extractor: &Extractor<BrowserEngine>,
    url: &str,
) -> Result<Vec<leadscan_core::ExtractionResult>> {
    let (reporter, mut rx) = ChannelReporter::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&ExtractionEvent::from(event));
        }
    });

    let outcome = extractor.extract(url, &reporter).await;
    drop(reporter);
    printer.await.context("event printer panicked")?;

    match outcome {
        Ok(results) => {
            print_event(&ExtractionEvent::Result(results.clone()));
            Ok(results)
        }
        Err(e) => {
            print_event(&ExtractionEvent::Error {
                error: e.to_string(),
            });
            Err(e.into())
        }
    }
}

fn print_event(event: &ExtractionEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!("Failed to serialize event: {}", e),
    }
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

pub fn config(action: &ConfigAction, path: Option<&Path>) -> Result<()> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::config_path()?,
    };

    match action {
        ConfigAction::Path => println!("{}", config_path.display()),
        ConfigAction::Show => {
            let config = load_config(path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => init_config(&config_path, *force)?,
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    AppConfig::default()
        .save_to(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
