use std::{env, path::Path};

use abi::Config;
use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CONFIG_CANDIDATES: &[&str] = &["./msgtail.yml", "/etc/msgtail/msgtail.yml"];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout only carries the messages
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let filename = config_file()?;
    let config = Config::load(&filename).with_context(|| format!("cannot use {}", filename))?;

    service::start_listener(&config).await?;
    Ok(())
}

fn config_file() -> Result<String> {
    if let Ok(filename) = env::var("MSGTAIL_CONFIG") {
        return Ok(filename);
    }
    CONFIG_CANDIDATES
        .iter()
        .find(|p| Path::new(p).exists())
        .map(|p| p.to_string())
        .ok_or_else(|| {
            anyhow!(
                "no config file found, set MSGTAIL_CONFIG or create one of {}",
                CONFIG_CANDIDATES.join(", ")
            )
        })
}
