//! # Harvest Runtime
//!
//! Wires the claim ledger behind the Persistence Gateway.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (`HV_CONFIG` file, then environment overrides)
//! 2. Validate it
//! 3. Restore the ledger from its snapshot, if one is configured and present
//! 4. Serve the gateway; every accepted mutation rewrites the snapshot
//!
//! ## Shutdown
//!
//! Stop accepting requests, drain in-flight ones, then write the snapshot.
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `HV_CONFIG` | Path to a JSON `GatewayConfig` |
//! | `HV_HTTP_PORT` | Overrides `http.port` |
//! | `HV_SNAPSHOT_PATH` | Overrides `ledger.snapshot_path` |

use anyhow::{Context, Result};
use hv_01_claim_ledger::{
    load_snapshot, save_snapshot, ClaimLedger, ClaimLedgerApi, ClaimLedgerService, LedgerHandler,
    RandomCodeGenerator, SystemTimeSource,
};
use hv_05_gateway::{ActionRouter, GatewayConfig, GatewayService, LocalGateway};
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

type Ledger = ClaimLedgerService<SystemTimeSource, RandomCodeGenerator>;

/// The running backend.
pub struct HarvestRuntime {
    config: GatewayConfig,
    ledger: Arc<Ledger>,
    router: ActionRouter,
    gateway: GatewayService,
}

impl HarvestRuntime {
    /// Validates `config` and restores the ledger.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate().context("invalid gateway configuration")?;

        let ledger_config = config.ledger.ledger_config();
        let ledger = match &config.ledger.snapshot_path {
            Some(path) => match load_snapshot(path)
                .with_context(|| format!("cannot read snapshot {}", path.display()))?
            {
                Some(snapshot) => {
                    let ledger = ClaimLedger::restore(ledger_config, snapshot)
                        .with_context(|| format!("cannot restore snapshot {}", path.display()))?;
                    info!(path = %path.display(), "Ledger restored from snapshot");
                    ledger
                }
                None => {
                    info!(path = %path.display(), "No snapshot yet, starting empty ledger");
                    ClaimLedger::new(ledger_config)
                }
            },
            None => {
                warn!("No snapshot path configured, ledger is in-memory only");
                ClaimLedger::new(ledger_config)
            }
        };

        let mut service = ClaimLedgerService::new(ledger, SystemTimeSource, RandomCodeGenerator);
        if let Some(path) = &config.ledger.snapshot_path {
            service = service.with_snapshot_path(path);
        }
        let ledger = Arc::new(service);
        let ledger_api: Arc<dyn ClaimLedgerApi> = ledger.clone();
        let router = ActionRouter::new(LedgerHandler::new(ledger_api));
        let gateway = GatewayService::new(config.clone(), router.clone());

        Ok(Self {
            config,
            ledger,
            router,
            gateway,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// In-process gateway over the same ledger.
    pub fn local_gateway(&self) -> LocalGateway {
        LocalGateway::new(self.router.clone())
    }

    /// Binds the configured address and starts serving.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        let addr = self.gateway.start().await?;
        info!(addr = %addr, "Harvest gateway listening");
        Ok(addr)
    }

    /// Serves on a pre-bound listener.
    pub fn serve(&mut self, listener: tokio::net::TcpListener) -> Result<SocketAddr> {
        Ok(self.gateway.serve(listener)?)
    }

    /// Serves until `signal`, then drains and persists.
    pub async fn run_until<F: Future<Output = ()>>(&mut self, signal: F) -> Result<()> {
        let served = self.gateway.run_until(signal).await;
        self.persist()?;
        Ok(served?)
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.gateway.shutdown().await?;
        self.persist()
    }

    /// Writes the ledger snapshot, if a path is configured.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.config.ledger.snapshot_path else {
            return Ok(());
        };
        save_snapshot(path, &self.ledger.snapshot())
            .with_context(|| format!("cannot write snapshot {}", path.display()))?;
        info!(path = %path.display(), "Ledger snapshot written");
        Ok(())
    }
}

/// Loads configuration from `HV_CONFIG` and environment overrides.
pub fn load_config() -> Result<GatewayConfig> {
    let config_path = std::env::var("HV_CONFIG").ok();
    load_config_from(
        config_path.as_deref().map(Path::new),
        |key| std::env::var(key).ok(),
    )
}

/// Same as [`load_config`] with explicit inputs.
pub fn load_config_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<GatewayConfig> {
    let mut config = match path {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(port) = env("HV_HTTP_PORT") {
        config.http.port = port
            .parse()
            .with_context(|| format!("HV_HTTP_PORT is not a port: {port}"))?;
    }
    if let Some(path) = env("HV_SNAPSHOT_PATH") {
        config.ledger.snapshot_path = Some(path.into());
    }

    Ok(config)
}
