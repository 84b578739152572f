//! In-process adapter for [`PersistenceGateway`].
//!
//! Same envelopes as the HTTP path without a socket; used by the runtime's
//! own clients and by tests.

use crate::router::ActionRouter;
use async_trait::async_trait;
use shared_types::{GatewayError, GatewayRequest, GatewayResponse, PersistenceGateway};

#[derive(Clone)]
pub struct LocalGateway {
    router: ActionRouter,
}

impl LocalGateway {
    pub fn new(router: ActionRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl PersistenceGateway for LocalGateway {
    async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        Ok(self.router.dispatch(request))
    }
}
