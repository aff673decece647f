#[cfg(test)]
pub mod test_utils;

use std::{env, future::Future, io::Write};

use abi::Config;
use anyhow::Context;
use msgtail::{BoundedPollLoop, PgMailbox, PollStats, SchemaProvisioner};
use tracing::{info, warn};

/// Provision the schema, then print every message inserted during the
/// configured window to stdout. Ctrl-C aborts the wait.
pub async fn start_listener(config: &Config) -> Result<PollStats, anyhow::Error> {
    let url = database_url(config);
    let mut mailbox = connect(&url).await?;
    let mut poll = BoundedPollLoop::from_config(abi::CHANNEL, &config.listen);
    let mut out = std::io::stdout();

    listen(&mut mailbox, &mut poll, &mut out, shutdown_signal()).await
}

/// Connect and bring the schema up to date. Nothing is listened on yet.
pub async fn connect(url: &str) -> Result<PgMailbox, anyhow::Error> {
    let mut mailbox = PgMailbox::connect(url)
        .await
        .context("failed to connect to the database")?;
    mailbox
        .ensure()
        .await
        .context("failed to provision the message schema")?;
    Ok(mailbox)
}

pub async fn listen<W, F>(
    mailbox: &mut PgMailbox,
    poll: &mut BoundedPollLoop,
    out: &mut W,
    shutdown: F,
) -> Result<PollStats, anyhow::Error>
where
    W: Write,
    F: Future<Output = ()>,
{
    let stats = poll
        .run(mailbox, out, shutdown)
        .await
        .with_context(|| format!("failed while listening on `{}`", abi::CHANNEL))?;
    Ok(stats)
}

fn database_url(config: &Config) -> String {
    match env::var("DATABASE_URL") {
        Ok(url) => {
            info!("using DATABASE_URL instead of the configured database");
            url
        }
        Err(_) => config.db.get_url(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // without a signal handler the run can only end at its deadline
        warn!("cannot listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
