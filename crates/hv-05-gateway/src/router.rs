//! Action dispatch for the single gateway endpoint.
//!
//! Every request is `{action, data}`; the router decodes `data` into the
//! action's typed request, calls the ledger and wraps the outcome in a
//! response envelope. Failures never escape as transport errors: the HTTP
//! layer always answers 200 with `status: "error"` and a `code`.

use harvest_telemetry::{
    log_event, metric_inc, ActionTimer, CLAIMS_COMPLETED, CLAIMS_CREATED, CLAIMS_REJECTED,
    FEEDBACK_SUBMITTED, GATEWAY_ACTIONS, VERIFICATIONS,
};
use hv_01_claim_ledger::{LedgerError, LedgerHandler};
use serde_json::Value;
use shared_types::{
    AddFoodItem, ClaimStatus, GatewayCommand, GatewayRequest, GatewayResponse, GetClaims,
    GetInventory, ProcessClaim, RejectionCode, SubmitReport, SubmitReview, UpdateClaimStatus,
    VerifyOrderQr, VerifyOrderResponse,
};

const COMPONENT: &str = "gateway";

/// Routes envelopes to the ledger handler.
#[derive(Clone)]
pub struct ActionRouter {
    handler: LedgerHandler,
}

impl ActionRouter {
    pub fn new(handler: LedgerHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &LedgerHandler {
        &self.handler
    }

    /// Handles one envelope.
    pub fn dispatch(&self, request: GatewayRequest) -> GatewayResponse {
        let GatewayRequest { action, data } = request;
        let metric_label = if shared_types::ALL_ACTIONS.contains(&action.as_str()) {
            action.as_str()
        } else {
            "unknown"
        };
        let _timer = ActionTimer::start(metric_label);

        let response = match action.as_str() {
            ProcessClaim::ACTION => self.run::<ProcessClaim>(data, |req| {
                let record = self.handler.handle_process_claim(req).inspect_err(|err| {
                    metric_inc!(CLAIMS_REJECTED, &[err.code().as_str()]);
                })?;
                metric_inc!(CLAIMS_CREATED);
                log_event!(
                    info,
                    COMPONENT,
                    "claim created",
                    claim_id = %record.id,
                    food_id = %record.food_id,
                    quantity = record.claimed_quantity
                );
                Ok(record)
            }),
            UpdateClaimStatus::ACTION => self.run::<UpdateClaimStatus>(data, |req| {
                let record = self.handler.handle_update_status(req)?;
                if record.status == ClaimStatus::Completed {
                    metric_inc!(CLAIMS_COMPLETED);
                }
                Ok(record)
            }),
            VerifyOrderQr::ACTION => self.run::<VerifyOrderQr>(data, |req| {
                let outcome = self.handler.handle_verify(&req);
                metric_inc!(VERIFICATIONS, &[outcome.label()]);
                Ok(VerifyOrderResponse::from(outcome))
            }),
            SubmitReview::ACTION => self.run::<SubmitReview>(data, |req| {
                let record = self.handler.handle_review(req)?;
                metric_inc!(FEEDBACK_SUBMITTED, &["review"]);
                Ok(record)
            }),
            SubmitReport::ACTION => self.run::<SubmitReport>(data, |req| {
                let record = self.handler.handle_report(req)?;
                metric_inc!(FEEDBACK_SUBMITTED, &["report"]);
                Ok(record)
            }),
            GetClaims::ACTION => {
                self.run::<GetClaims>(data, |filter| Ok(self.handler.handle_get_claims(&filter)))
            }
            GetInventory::ACTION => self.run::<GetInventory>(data, |filter| {
                Ok(self.handler.handle_get_inventory(&filter))
            }),
            AddFoodItem::ACTION => {
                self.run::<AddFoodItem>(data, |item| self.handler.handle_add_food_item(item))
            }
            other => {
                log_event!(warn, COMPONENT, "unknown action", action = %other);
                GatewayResponse::error(
                    RejectionCode::UnknownAction,
                    format!("unknown action '{other}'"),
                )
            }
        };

        let status = if response.is_success() { "success" } else { "error" };
        metric_inc!(GATEWAY_ACTIONS, &[metric_label, status]);
        response
    }

    fn run<C: GatewayCommand>(
        &self,
        data: Value,
        f: impl FnOnce(C::Request) -> Result<C::Response, LedgerError>,
    ) -> GatewayResponse {
        let request: C::Request = match serde_json::from_value(data) {
            Ok(request) => request,
            Err(e) => {
                log_event!(debug, COMPONENT, "undecodable request", action = C::ACTION, error = %e);
                return GatewayResponse::error(
                    RejectionCode::InvalidRequest,
                    format!("{}: {e}", C::ACTION),
                );
            }
        };

        match f(request) {
            Ok(response) => match serde_json::to_value(&response) {
                Ok(value) => GatewayResponse::success(value),
                Err(e) => {
                    log_event!(error, COMPONENT, "cannot encode response", action = C::ACTION, error = %e);
                    GatewayResponse::error(RejectionCode::Internal, "response encoding failed")
                }
            },
            Err(err) => {
                let code = err.code();
                log_event!(
                    debug,
                    COMPONENT,
                    "action rejected",
                    action = C::ACTION,
                    code = code.as_str(),
                    reason = %err
                );
                GatewayResponse::error(code, err.to_string())
            }
        }
    }
}
