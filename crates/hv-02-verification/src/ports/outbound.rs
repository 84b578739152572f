//! # Outbound Ports - Camera & Decoder
//!
//! ```text
//! CameraDevice::open() ──→ MediaStream ──next_frame()──→ Frame ──→ FrameDecoder
//!                               │
//!                               └── tracks() ──→ MediaTracks::stop_all()
//! ```
//!
//! `MediaTracks` is split from the stream so that teardown can happen from
//! outside the task that owns the stream.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Camera acquisition failures. All of them degrade to manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("camera is in use by another application")]
    Busy,

    #[error("no camera found")]
    NotFound,

    /// Stream stopped producing frames.
    #[error("camera stream ended")]
    StreamEnded,

    #[error("camera error: {0}")]
    Other(String),
}

/// One captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Stop switch for every track of a stream. `stop_all` must be idempotent.
pub trait MediaTracks: Send + Sync {
    fn stop_all(&self);

    /// Tracks still capturing.
    fn live_count(&self) -> usize;
}

/// Live camera feed.
#[async_trait]
pub trait MediaStream: Send {
    /// Next rendered frame, `None` once the stream has ended.
    async fn next_frame(&mut self) -> Option<Frame>;

    fn tracks(&self) -> Arc<dyn MediaTracks>;
}

/// Source of camera streams.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    async fn open(&self) -> Result<Box<dyn MediaStream>, CameraError>;
}

/// 2-D barcode decoder. One call per frame, no state between calls.
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, frame: &Frame) -> Option<String>;
}

// =============================================================================
// TEST DOUBLES
// =============================================================================
