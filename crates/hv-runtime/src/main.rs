//! Harvest backend entry point.

use anyhow::Result;
use harvest_telemetry::{init_telemetry, TelemetryConfig};
use hv_runtime::{load_config, HarvestRuntime};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())?;

    let config = load_config()?;
    let mut runtime = HarvestRuntime::new(config)?;
    runtime.start().await?;

    info!("Harvest is running. Press Ctrl+C to stop.");
    runtime
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
