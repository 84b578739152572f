//! # Scan Loop
//!
//! Cancellable background task decoding camera frames.
//!
//! ```text
//! spawn_scan_loop(stream) ──→ ScanHandle
//!      task: next_frame → decode → try_send(code) → yield ─┐
//!            ↑_____________________________________________┘
//!      exit (stream ended / handle gone / abort): TrackGuard stops tracks
//! ```
//!
//! Codes go through a one-slot channel. While a decoded code is waiting to
//! be picked up, later decodes are dropped rather than queued.

use crate::ports::{FrameDecoder, MediaStream, MediaTracks};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::debug;

/// Stops every track when dropped.
struct TrackGuard(Arc<dyn MediaTracks>);

impl Drop for TrackGuard {
    fn drop(&mut self) {
        self.0.stop_all();
    }
}

/// Owned handle to a running scan loop.
///
/// Dropping the handle cancels the loop.
pub struct ScanHandle {
    task: Option<JoinHandle<()>>,
    tracks: Arc<dyn MediaTracks>,
    codes: mpsc::Receiver<String>,
}

/// Starts decoding `stream` on the current tokio runtime.
pub fn spawn_scan_loop(stream: Box<dyn MediaStream>, decoder: Arc<dyn FrameDecoder>) -> ScanHandle {
    let tracks = stream.tracks();
    let (tx, rx) = mpsc::channel(1);
    let task = tokio::spawn(scan_loop(stream, decoder, tx));
    ScanHandle {
        task: Some(task),
        tracks,
        codes: rx,
    }
}

async fn scan_loop(
    mut stream: Box<dyn MediaStream>,
    decoder: Arc<dyn FrameDecoder>,
    codes: mpsc::Sender<String>,
) {
    let _guard = TrackGuard(stream.tracks());
    let mut frames: u64 = 0;

    while let Some(frame) = stream.next_frame().await {
        frames += 1;
        if let Some(code) = decoder.decode(&frame) {
            match codes.try_send(code) {
                Ok(()) => debug!(frames, "code decoded"),
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Closed(_)) => break,
            }
        }
        tokio::task::yield_now().await;
    }

    debug!(frames, "scan loop finished");
}

impl ScanHandle {
    /// Next decoded code. `None` once the loop has ended and every decoded
    /// code has been taken.
    pub async fn next_code(&mut self) -> Option<String> {
        self.codes.recv().await
    }

    /// Stops the loop and all tracks. Safe to call any number of times.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("scan loop cancelled");
        }
        self.tracks.stop_all();
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn live_tracks(&self) -> usize {
        self.tracks.live_count()
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::fakes::{blank, qr, FakeCamera, PrefixDecoder};
    use crate::ports::CameraDevice;

    #[tokio::test]
    async fn test_decodes_first_code() {
        let camera = FakeCamera::with_frames(vec![blank(), blank(), qr("ABCDEFGHJK")]);
        let stream = camera.open().await.unwrap();
        let mut handle = spawn_scan_loop(stream, Arc::new(PrefixDecoder));

        assert_eq!(handle.next_code().await.as_deref(), Some("ABCDEFGHJK"));
        assert!(handle.live_tracks() > 0);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent_and_stops_tracks() {
        let camera = FakeCamera::with_frames(vec![]);
        let stream = camera.open().await.unwrap();
        let mut handle = spawn_scan_loop(stream, Arc::new(PrefixDecoder));
        assert_eq!(camera.tracks.live_count(), 2);

        handle.cancel();
        handle.cancel();

        assert_eq!(camera.tracks.live_count(), 0);
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_drop_stops_tracks() {
        let camera = FakeCamera::with_frames(vec![]);
        let stream = camera.open().await.unwrap();
        let handle = spawn_scan_loop(stream, Arc::new(PrefixDecoder));

        drop(handle);

        assert_eq!(camera.tracks.live_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_end_releases_tracks() {
        let camera = FakeCamera::ending_after(vec![blank()]);
        let stream = camera.open().await.unwrap();
        let mut handle = spawn_scan_loop(stream, Arc::new(PrefixDecoder));

        assert_eq!(handle.next_code().await, None);
        assert_eq!(camera.tracks.live_count(), 0);
    }
}
