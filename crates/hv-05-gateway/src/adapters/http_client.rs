//! HTTP adapter for [`PersistenceGateway`].

use async_trait::async_trait;
use reqwest::Client;
use shared_types::{parse_envelope, GatewayError, GatewayRequest, GatewayResponse, PersistenceGateway};
use std::net::SocketAddr;
use std::time::Duration;

/// Where and how patiently to reach the gateway.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the envelope endpoint.
    pub endpoint: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn for_addr(addr: SocketAddr) -> Self {
        Self::new(format!("http://{addr}/"))
    }
}

/// Talks to a remote gateway over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(e.to_string())
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        match parse_envelope(&body) {
            Ok(envelope) => Ok(envelope),
            // Non-200 without an envelope is a transport failure (413, 408, proxies).
            Err(GatewayError::Malformed(_)) if !status.is_success() => {
                Err(GatewayError::Transport(format!("HTTP {status}")))
            }
            Err(e) => {
                tracing::warn!(action = %request.action, error = %e, "unusable gateway response");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn fake_server(router: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_html_page_is_misconfiguration() {
        let addr = fake_server(Router::new().route(
            "/",
            post(|| async { "<!DOCTYPE html><html><body>Not Found</body></html>" }),
        ))
        .await;

        let gateway = HttpGateway::new(ClientConfig::for_addr(addr)).unwrap();
        let err = gateway
            .dispatch(GatewayRequest::new("GET_INVENTORY", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Misconfigured { ref preview } if preview.starts_with("<!DOCTYPE")));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpGateway::new(ClientConfig::for_addr(addr)).unwrap();
        let err = gateway
            .dispatch(GatewayRequest::new("GET_INVENTORY", json!({})))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let addr = fake_server(Router::new().route(
            "/",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        ))
        .await;

        let mut config = ClientConfig::for_addr(addr);
        config.request_timeout = Duration::from_millis(100);
        let gateway = HttpGateway::new(config).unwrap();
        let err = gateway
            .dispatch(GatewayRequest::new("GET_INVENTORY", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
    }
}
