//! Cooperative cancellation checked between text units.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable flag an embedding layer can set while a walk is running.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The walk stops before the next unit.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        log::info!("Cancel requested");
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear a previous request so the token can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// What to do with a document whose walk was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelMode {
    /// Serialize the partially translated document.
    #[default]
    ReturnPartial,
    /// Drop the partial result and report `Error::Cancelled`.
    Discard,
}
