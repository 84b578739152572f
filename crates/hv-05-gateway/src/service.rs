//! HTTP front of the gateway.
//!
//! ```text
//! POST /          envelope in, envelope out (always HTTP 200)
//! GET  /health    liveness and ledger counters
//! GET  /metrics   Prometheus text format
//! ```
//!
//! The envelope route enforces the body limit and request timeout itself so
//! that both failures still answer with an error envelope. The operational
//! routes use the tower-http timeout.

use crate::domain::{GatewayConfig, GatewayServerError};
use crate::middleware::create_cors_layer;
use crate::router::ActionRouter;
use axum::{
    body::{self, Bytes},
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use harvest_telemetry::encode_metrics;
use shared_types::{GatewayRequest, GatewayResponse, RejectionCode};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// Shared state for handlers
#[derive(Clone)]
struct AppState {
    router: Arc<ActionRouter>,
    max_body_bytes: usize,
    request_timeout: Duration,
}

/// Gateway HTTP server.
pub struct GatewayService {
    config: GatewayConfig,
    router: Arc<ActionRouter>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<std::io::Result<()>>>,
    local_addr: Option<SocketAddr>,
}

impl GatewayService {
    pub fn new(config: GatewayConfig, router: ActionRouter) -> Self {
        Self {
            config,
            router: Arc::new(router),
            shutdown_tx: None,
            server: None,
            local_addr: None,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Address the server is listening on, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.server.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Validates the configuration, binds the configured address and starts
    /// serving in the background.
    pub async fn start(&mut self) -> Result<SocketAddr, GatewayServerError> {
        self.config.validate()?;
        if !self.config.http.enabled {
            return Err(GatewayServerError::Disabled);
        }

        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayServerError::Bind { addr, source })?;
        self.serve(listener)
    }

    /// Starts serving on an already bound listener.
    pub fn serve(&mut self, listener: TcpListener) -> Result<SocketAddr, GatewayServerError> {
        if self.is_running() {
            return Err(GatewayServerError::AlreadyRunning);
        }

        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = self.build_router();

        info!(addr = %addr, "Starting gateway HTTP server");
        self.server = Some(tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        }));
        self.shutdown_tx = Some(shutdown_tx);
        self.local_addr = Some(addr);
        Ok(addr)
    }

    /// Serves until `signal` resolves or the server stops on its own, then
    /// shuts down gracefully.
    pub async fn run_until<F>(&mut self, signal: F) -> Result<(), GatewayServerError>
    where
        F: Future<Output = ()>,
    {
        let Some(mut server) = self.server.take() else {
            return Ok(());
        };

        tokio::select! {
            _ = signal => {
                info!("Received shutdown signal");
                if let Some(tx) = self.shutdown_tx.take() {
                    let _ = tx.send(());
                }
                Self::join(server).await
            }
            result = &mut server => {
                self.shutdown_tx = None;
                match result {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => {
                        error!(error = %e, "HTTP server error");
                        Err(GatewayServerError::Io(e))
                    }
                    Err(e) => Err(GatewayServerError::Task(e.to_string())),
                }
            }
        }
    }

    /// Triggers graceful shutdown and waits for in-flight requests.
    pub async fn shutdown(&mut self) -> Result<(), GatewayServerError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.server.take() {
            Some(server) => Self::join(server).await,
            None => Ok(()),
        }
    }

    async fn join(server: JoinHandle<std::io::Result<()>>) -> Result<(), GatewayServerError> {
        let result = server
            .await
            .map_err(|e| GatewayServerError::Task(e.to_string()))?;
        info!("Gateway HTTP server stopped");
        result.map_err(GatewayServerError::Io)
    }

    fn build_router(&self) -> Router {
        let state = AppState {
            router: Arc::clone(&self.router),
            max_body_bytes: self.config.limits.max_body_bytes,
            request_timeout: self.config.timeouts.request,
        };

        let operational = Router::new()
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .layer(TimeoutLayer::new(self.config.timeouts.request));

        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config.cors));

        Router::new()
            .route("/", post(handle_envelope))
            .merge(operational)
            .layer(middleware)
            .with_state(state)
    }
}

impl Drop for GatewayService {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Single envelope endpoint. Oversized, slow and malformed bodies still get
/// an envelope back.
async fn handle_envelope(State(state): State<AppState>, request: Request) -> Json<GatewayResponse> {
    let body = match read_body(&state, request).await {
        Ok(body) => body,
        Err(response) => return Json(response),
    };
    let request: GatewayRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "body is not a gateway envelope");
            return Json(GatewayResponse::error(
                RejectionCode::InvalidRequest,
                format!("invalid envelope: {e}"),
            ));
        }
    };
    Json(state.router.dispatch(request))
}

async fn read_body(state: &AppState, request: Request) -> Result<Bytes, GatewayResponse> {
    let limit = state.max_body_bytes;
    let read = body::to_bytes(request.into_body(), limit);
    match tokio::time::timeout(state.request_timeout, read).await {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => {
            warn!(error = %e, limit, "request body rejected");
            Err(GatewayResponse::error(
                RejectionCode::InvalidRequest,
                format!("request body unreadable or larger than {limit} bytes"),
            ))
        }
        Err(_) => {
            warn!(timeout = ?state.request_timeout, "request body timed out");
            Err(GatewayResponse::error(
                RejectionCode::InvalidRequest,
                format!(
                    "request body not received within {}ms",
                    state.request_timeout.as_millis()
                ),
            ))
        }
    }
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.router.handler().ledger().status();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "harvest-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "ledger": status,
    }))
}

async fn metrics() -> impl IntoResponse {
    match encode_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ClientConfig, HttpGateway};
    use hv_01_claim_ledger::{
        ClaimLedger, ClaimLedgerService, LedgerHandler, RandomCodeGenerator, SystemTimeSource,
    };
    use serde_json::json;
    use shared_types::{GetInventory, InventoryFilter, PersistenceGateway};

    fn service(config: GatewayConfig) -> GatewayService {
        let ledger = ClaimLedgerService::new(
            ClaimLedger::with_defaults(),
            SystemTimeSource,
            RandomCodeGenerator,
        );
        GatewayService::new(config, ActionRouter::new(LedgerHandler::new(Arc::new(ledger))))
    }

    async fn started() -> (GatewayService, SocketAddr) {
        let mut svc = service(GatewayConfig::default());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = svc.serve(listener).unwrap();
        (svc, addr)
    }

    #[tokio::test]
    async fn test_invalid_config_refuses_start() {
        let mut config = GatewayConfig::default();
        config.ledger.code_length = 2;
        let mut svc = service(config);
        assert!(matches!(
            svc.start().await,
            Err(GatewayServerError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_envelope_round_trip_over_http() {
        let (mut svc, addr) = started().await;
        let gateway = HttpGateway::new(ClientConfig::for_addr(addr)).unwrap();

        let items = shared_types::send::<GetInventory, _>(&gateway, &InventoryFilter::default())
            .await
            .unwrap();
        assert!(items.is_empty());

        let resp = gateway
            .dispatch(GatewayRequest::new("NOPE", json!({})))
            .await
            .unwrap();
        assert_eq!(resp.code, Some(RejectionCode::UnknownAction));

        svc.shutdown().await.unwrap();
        assert!(!svc.is_running());
    }

    #[tokio::test]
    async fn test_garbage_body_gets_error_envelope() {
        let (mut svc, addr) = started().await;
        let body = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .body("not json")
            .send()
            .await
            .unwrap();
        assert_eq!(body.status(), reqwest::StatusCode::OK);
        let envelope: GatewayResponse = body.json().await.unwrap();
        assert_eq!(envelope.code, Some(RejectionCode::InvalidRequest));
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_oversized_body_gets_error_envelope() {
        let mut config = GatewayConfig::default();
        config.limits.max_body_bytes = 64;
        let mut svc = service(config);
        let addr = svc
            .serve(TcpListener::bind("127.0.0.1:0").await.unwrap())
            .unwrap();
        let gateway = HttpGateway::new(ClientConfig::for_addr(addr)).unwrap();

        let resp = gateway
            .dispatch(GatewayRequest::new(
                "GET_CLAIMS",
                json!({ "receiverId": "r".repeat(200) }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.code, Some(RejectionCode::InvalidRequest));
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_stalled_body_gets_error_envelope() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut config = GatewayConfig::default();
        config.timeouts.request = std::time::Duration::from_millis(200);
        let mut svc = service(config);
        let addr = svc
            .serve(TcpListener::bind("127.0.0.1:0").await.unwrap())
            .unwrap();

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{",
            )
            .await
            .unwrap();

        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        let read_reply = async {
            while !String::from_utf8_lossy(&received).contains("INVALID_REQUEST") {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed without an envelope");
                received.extend_from_slice(&buf[..n]);
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(5), read_reply)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&received).starts_with("HTTP/1.1 200"));
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_health_reports_ledger() {
        let (mut svc, addr) = started().await;
        let health: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], json!("healthy"));
        assert_eq!(health["ledger"]["claims"], json!(0));
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_second_serve_refused() {
        let (mut svc, _) = started().await;
        let other = TcpListener::bind("127.0.0.1:0").await.unwrap();
        assert!(matches!(
            svc.serve(other),
            Err(GatewayServerError::AlreadyRunning)
        ));
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_until_signal() {
        let (mut svc, _) = started().await;
        let (tx, rx) = oneshot::channel::<()>();
        tx.send(()).unwrap();
        svc.run_until(async {
            let _ = rx.await;
        })
        .await
        .unwrap();
        assert!(!svc.is_running());
    }
}
