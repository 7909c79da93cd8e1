use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Counts requests served by the static file server.
///
/// Owned by [`AppState`](crate::state::AppState); clones share the same count.
#[derive(Clone, Debug, Default)]
pub struct HitCounter {
    hits: Arc<AtomicU64>,
}

impl HitCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one hit.
    pub fn increment(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current number of hits.
    pub fn load(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Sets the count back to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}
