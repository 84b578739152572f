//! # Persistence Gateway (hv-05)
//!
//! The one endpoint every Harvest client talks to. Requests are
//! `{action, data}` envelopes; responses are `{status, data | message, code}`
//! envelopes, always over HTTP 200.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        hv-05-gateway                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  service.rs     axum: POST /, GET /health, GET /metrics      │
//! │                 trace + CORS layers, in-handler size/timeout │
//! ├──────────────────────────────────────────────────────────────┤
//! │  router.rs      action name -> typed request -> ledger call  │
//! │                 LedgerError -> RejectionCode                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │  adapters/      HttpGateway (reqwest), LocalGateway          │
//! │                 both implement PersistenceGateway            │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                    hv-01-claim-ledger
//! ```
//!
//! ## Guarantees
//!
//! | Guarantee | Where |
//! |-----------|-------|
//! | Unknown actions answer `UNKNOWN_ACTION`, never a 404 | `router.rs` |
//! | Undecodable payloads answer `INVALID_REQUEST` | `router.rs`, `service.rs` |
//! | An HTML body from a misrouted URL is `Misconfigured` on the client | `adapters/http_client.rs` |
//! | Shutdown drains in-flight requests | `GatewayService::shutdown` |

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod router;
pub mod service;

pub use adapters::{ClientConfig, HttpGateway, LocalGateway};
pub use domain::{ConfigError, GatewayConfig, GatewayServerError};
pub use router::ActionRouter;
pub use service::GatewayService;
