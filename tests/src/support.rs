//! Shared fixtures: a fresh ledger behind a [`LocalGateway`], plus fakes for
//! the device-side ports (camera, code decoder, directory, media store).

use async_trait::async_trait;
use hv_01_claim_ledger::{
    ClaimLedger, ClaimLedgerService, LedgerHandler, RandomCodeGenerator, SystemTimeSource,
};
use hv_02_verification::{CameraDevice, CameraError, Frame, FrameDecoder, MediaStream, MediaTracks};
use hv_03_distribution::{CourierContact, DirectoryLookup};
use hv_04_feedback::{MediaAsset, MediaUploader, UploadError};
use hv_05_gateway::{ActionRouter, LocalGateway};
use parking_lot::Mutex;
use shared_types::{
    send, AddFoodItem, DeliveryCapability, DistributionWindow, FoodItem, GatewayError,
    NewFoodItem, PersistenceGateway, ProviderId, ReceiverId,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Router over a fresh, empty ledger.
pub fn fresh_router() -> ActionRouter {
    let ledger = ClaimLedgerService::new(
        ClaimLedger::with_defaults(),
        SystemTimeSource,
        RandomCodeGenerator,
    );
    ActionRouter::new(LedgerHandler::new(Arc::new(ledger)))
}

/// In-process gateway over a fresh, empty ledger.
pub fn fresh_gateway() -> LocalGateway {
    LocalGateway::new(fresh_router())
}

pub fn provider(n: u32) -> ProviderId {
    ProviderId::new(format!("prov-{n}"))
}

pub fn receiver(n: u32) -> ReceiverId {
    ReceiverId::new(format!("recv-{n}"))
}

/// Lists `quantity` portions for `provider`, claimable 1..=`max_per_claim`.
pub async fn list_food<G: PersistenceGateway>(
    gateway: &G,
    provider: &ProviderId,
    name: &str,
    quantity: u32,
    max_per_claim: u32,
    capability: DeliveryCapability,
) -> Result<FoodItem, GatewayError> {
    send::<AddFoodItem, _>(
        gateway,
        &NewFoodItem {
            provider_id: provider.clone(),
            provider_name: format!("Stall {provider}"),
            name: name.to_string(),
            initial_quantity: quantity,
            min_quantity: 1,
            max_quantity: max_per_claim,
            window: DistributionWindow::ALWAYS,
            delivery_capability: capability,
        },
    )
    .await
}

// =============================================================================
// Camera
// =============================================================================

/// Track set counting how many are still live.
pub struct CountingTracks {
    live: AtomicUsize,
}

impl CountingTracks {
    pub fn new(tracks: usize) -> Arc<Self> {
        Arc::new(Self {
            live: AtomicUsize::new(tracks),
        })
    }
}

impl MediaTracks for CountingTracks {
    fn stop_all(&self) {
        self.live.store(0, Ordering::SeqCst);
    }

    fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Plays back a list of frames, then idles on blank frames.
pub struct ScriptedStream {
    frames: VecDeque<Frame>,
    tracks: Arc<CountingTracks>,
}

#[async_trait]
impl MediaStream for ScriptedStream {
    async fn next_frame(&mut self) -> Option<Frame> {
        tokio::time::sleep(Duration::from_millis(2)).await;
        Some(self.frames.pop_front().unwrap_or_else(blank_frame))
    }

    fn tracks(&self) -> Arc<dyn MediaTracks> {
        self.tracks.clone()
    }
}

/// Camera that shows the given frames once opened.
pub struct ScriptedCamera {
    frames: Mutex<Vec<Frame>>,
    pub tracks: Arc<CountingTracks>,
}

impl ScriptedCamera {
    pub fn showing(frames: Vec<Frame>) -> Self {
        Self {
            frames: Mutex::new(frames),
            tracks: CountingTracks::new(1),
        }
    }
}

#[async_trait]
impl CameraDevice for ScriptedCamera {
    async fn open(&self) -> Result<Box<dyn MediaStream>, CameraError> {
        let frames = std::mem::take(&mut *self.frames.lock());
        Ok(Box::new(ScriptedStream {
            frames: frames.into(),
            tracks: Arc::clone(&self.tracks),
        }))
    }
}

/// Camera the user refused access to.
pub struct DeniedCamera;

#[async_trait]
impl CameraDevice for DeniedCamera {
    async fn open(&self) -> Result<Box<dyn MediaStream>, CameraError> {
        Err(CameraError::PermissionDenied)
    }
}

/// Frames carry their code as UTF-8 payload.
pub struct TextDecoder;

impl FrameDecoder for TextDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        let text = std::str::from_utf8(&frame.data).ok()?;
        (!text.is_empty()).then(|| text.to_string())
    }
}

pub fn blank_frame() -> Frame {
    Frame {
        width: 1,
        height: 1,
        data: Vec::new(),
    }
}

pub fn code_frame(code: &str) -> Frame {
    Frame {
        width: 1,
        height: 1,
        data: code.as_bytes().to_vec(),
    }
}

// =============================================================================
// Directory and media store
// =============================================================================

/// Directory with one address per party and a fixed courier roster.
pub struct TownDirectory {
    pub couriers: Vec<CourierContact>,
}

impl DirectoryLookup for TownDirectory {
    fn provider_address(&self, id: &ProviderId) -> Option<String> {
        Some(format!("Jl. Pasar {id}"))
    }

    fn receiver_address(&self, id: &ReceiverId) -> Option<String> {
        Some(format!("Jl. Melati {id}"))
    }

    fn couriers(&self) -> Vec<CourierContact> {
        self.couriers.clone()
    }
}

/// Stores every upload under a predictable URL; names starting with
/// `broken` fail.
#[derive(Default)]
pub struct MemoryMediaStore {
    pub stored: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaUploader for MemoryMediaStore {
    async fn upload(&self, asset: &MediaAsset) -> Result<String, UploadError> {
        if asset.file_name.starts_with("broken") {
            return Err(UploadError::Transport("connection reset".into()));
        }
        let url = format!("https://media.harvest.test/{}", asset.file_name);
        self.stored.lock().push(url.clone());
        Ok(url)
    }
}

pub fn photo(name: &str) -> MediaAsset {
    MediaAsset::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}
