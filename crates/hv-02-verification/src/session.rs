//! # Verification Session
//!
//! Provider-side handover check. One session per open verification screen;
//! it owns the camera stream for its whole lifetime.
//!
//! ```text
//! open() ──camera ok──→ [Camera] ──switch_to_manual / stream error──→ [Manual]
//!   │                      │                                            │
//!   └──camera error────────┼────────────────────────────────────────────┘
//!                          └──────── close() / drop ──→ [Closed]
//! ```
//!
//! Every exit path (success, manual switch, close, drop) cancels the scan
//! loop and stops the tracks. The cached claim's `is_scanned` flag is only
//! set after the gateway answers `success`.

use crate::domain::{ScanMode, VerificationError, VerificationOutcome};
use crate::ports::{CameraDevice, CameraError, FrameDecoder};
use crate::scanner::{spawn_scan_loop, ScanHandle};
use shared_types::{
    send, ClaimRecord, EntityCache, PersistenceGateway, ProviderId, VerifyOrderQr,
    VerifyOrderRequest,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The provider running the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verifier {
    pub provider_id: ProviderId,
    pub provider_name: String,
}

pub struct VerificationSession<G: PersistenceGateway> {
    gateway: G,
    verifier: Verifier,
    claims: Option<Arc<EntityCache<ClaimRecord>>>,
    mode: ScanMode,
    scan: Option<ScanHandle>,
    fallback: Option<CameraError>,
    closed: bool,
}

impl<G: PersistenceGateway> VerificationSession<G> {
    /// Opens the camera and starts scanning, or falls back to manual entry.
    pub async fn open(
        gateway: G,
        verifier: Verifier,
        camera: &dyn CameraDevice,
        decoder: Arc<dyn FrameDecoder>,
    ) -> Self {
        let mut session = Self::manual(gateway, verifier);
        match camera.open().await {
            Ok(stream) => {
                session.scan = Some(spawn_scan_loop(stream, decoder));
                session.mode = ScanMode::Camera;
                debug!(provider_id = %session.verifier.provider_id, "camera scan started");
            }
            Err(e) => {
                warn!(error = %e, "camera unavailable, using manual entry");
                session.fallback = Some(e);
            }
        }
        session
    }

    /// Session without a camera.
    pub fn manual(gateway: G, verifier: Verifier) -> Self {
        Self {
            gateway,
            verifier,
            claims: None,
            mode: ScanMode::Manual,
            scan: None,
            fallback: None,
            closed: false,
        }
    }

    /// Cache to patch when a code is accepted.
    pub fn with_claim_cache(mut self, claims: Arc<EntityCache<ClaimRecord>>) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Why the session is in manual mode, if the camera failed.
    pub fn fallback_reason(&self) -> Option<&CameraError> {
        self.fallback.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_scanning(&self) -> bool {
        self.scan.as_ref().is_some_and(ScanHandle::is_running)
    }

    /// Stops the camera and continues with typed codes.
    pub fn switch_to_manual(&mut self) {
        self.stop_scan();
        self.mode = ScanMode::Manual;
    }

    /// Waits for the camera to decode a code.
    ///
    /// If the stream ends the session drops to manual mode and
    /// `CameraUnavailable(StreamEnded)` is returned.
    pub async fn next_scanned_code(&mut self) -> Result<String, VerificationError> {
        if self.closed {
            return Err(VerificationError::Closed);
        }
        let Some(scan) = self.scan.as_mut() else {
            return Err(VerificationError::ManualMode);
        };
        match scan.next_code().await {
            Some(code) => Ok(code),
            None => {
                self.switch_to_manual();
                self.fallback = Some(CameraError::StreamEnded);
                Err(CameraError::StreamEnded.into())
            }
        }
    }

    /// Scans one code and submits it.
    pub async fn scan_once(&mut self) -> Result<VerificationOutcome, VerificationError> {
        let code = self.next_scanned_code().await?;
        self.submit_code(&code).await
    }

    /// Submits a code from either source.
    ///
    /// Errors leave the cache and the scan loop untouched, so the same code
    /// can be submitted again.
    pub async fn submit_code(&mut self, raw: &str) -> Result<VerificationOutcome, VerificationError> {
        if self.closed {
            return Err(VerificationError::Closed);
        }
        let code = raw.trim();
        if code.is_empty() {
            return Err(VerificationError::EmptyCode);
        }

        let request = VerifyOrderRequest {
            unique_code: code.to_string(),
            scanned_by_provider_id: self.verifier.provider_id.clone(),
            scanned_by_provider_name: self.verifier.provider_name.clone(),
        };
        let response = send::<VerifyOrderQr, _>(&self.gateway, &request).await?;
        let outcome = VerificationOutcome::try_from(response)?;

        match &outcome {
            VerificationOutcome::Success { claim_id, food_name } => {
                self.stop_scan();
                if let Some(claims) = &self.claims {
                    if !claims.patch_by_id(claim_id, |c| c.is_scanned = true) {
                        debug!(claim_id = %claim_id, "verified claim not cached");
                    }
                }
                info!(claim_id = %claim_id, food = %food_name, "handover verified");
            }
            refused => {
                info!(outcome = ?refused, mode = ?self.mode, "code refused");
            }
        }
        Ok(outcome)
    }

    /// Releases the camera. Further submissions fail with `Closed`.
    pub fn close(&mut self) {
        self.stop_scan();
        self.closed = true;
    }

    fn stop_scan(&mut self) {
        if let Some(mut scan) = self.scan.take() {
            scan.cancel();
        }
    }
}

impl<G: PersistenceGateway> Drop for VerificationSession<G> {
    fn drop(&mut self) {
        self.stop_scan();
    }
}
