//! Outbound (Driven) ports for the Claim Ledger.
//!
//! The ledger needs a clock (distribution windows, timestamps) and a source
//! of verification codes. Both are abstracted for deterministic tests.

use rand::distributions::Alphanumeric;
use rand::Rng;
use shared_types::Timestamp;

/// Time source for consistent timestamp handling.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Source of opaque verification codes.
///
/// Uniqueness is checked by the ledger, which draws again on collision.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

/// Alphanumeric codes from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Replays a fixed list of codes, then repeats the last one.
#[cfg(test)]
pub struct ScriptedCodeGenerator {
    codes: parking_lot::Mutex<std::collections::VecDeque<String>>,
    last: parking_lot::Mutex<String>,
}

#[cfg(test)]
impl ScriptedCodeGenerator {
    pub fn new<I: IntoIterator<Item = &'static str>>(codes: I) -> Self {
        Self {
            codes: parking_lot::Mutex::new(codes.into_iter().map(String::from).collect()),
            last: parking_lot::Mutex::new(String::from("FALLBACK00")),
        }
    }
}

#[cfg(test)]
impl CodeGenerator for ScriptedCodeGenerator {
    fn generate(&self, _length: usize) -> String {
        match self.codes.lock().pop_front() {
            Some(code) => {
                *self.last.lock() = code.clone();
                code
            }
            None => self.last.lock().clone(),
        }
    }
}
