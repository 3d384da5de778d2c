//! Run control shared with the caller: cooperative cancellation and a
//! polled status handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::types::PipelineState;

/// Cooperative cancellation flag.
///
/// The runner checks it before each batch call and before the merge call.
/// An in-flight call always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop at the next stage boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Latest pipeline state, readable from another thread while a run is going.
#[derive(Debug, Clone)]
pub struct SharedStatus {
    state: Arc<Mutex<PipelineState>>,
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(PipelineState::Idle)),
        }
    }
}

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, state: PipelineState) {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *guard = state;
    }

    pub fn get(&self) -> PipelineState {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Progress callback that records every transition into this handle.
    pub fn observer(&self) -> impl Fn(PipelineState) + Send + Sync + 'static {
        let status = self.clone();
        move |state| status.set(state)
    }
}
