mod aggregator;
mod app;
mod backends;
mod config;
mod error;
mod filters;
mod interactive;
mod matcher;
mod models;
mod output;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::backends::JobSpyBackend;
use crate::config::Config;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("visajobs=info")),
        )
        .init();

    let config = Config::parse();

    let settings = if config.interactive {
        let Some(mut settings) = interactive::prompt()? else {
            return Ok(());
        };
        if let Some(url) = &config.backend_url {
            settings.backend.url = url.clone();
        }
        settings
    } else {
        let mut settings = Settings::load(config.config.as_deref());
        config.apply(&mut settings);
        settings
    };

    let backend = JobSpyBackend::new(&settings.backend.url, settings.backend.timeout_secs)?;
    app::run(&settings, &backend, config.output.as_deref()).await?;

    Ok(())
}
