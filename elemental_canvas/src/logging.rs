//! Console logging.

use anyhow::{anyhow, Result};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter}, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: LevelFilter) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(std::io::stderr) // stdout stays free for the banner
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))?;

    tracing::debug!(%level, "logging initialized");
    Ok(())
}
