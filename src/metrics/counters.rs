use std::sync::Arc;
use std::sync::atomic::AtomicU64;

/// Minimal counters for operational visibility.
#[derive(Clone, Default)]
pub struct Counters {
    pub bids_enqueued: Arc<AtomicU64>,
    pub bids_popped: Arc<AtomicU64>,
    pub bids_dropped_decode: Arc<AtomicU64>,

    pub bids_saved_relational: Arc<AtomicU64>,
    pub bids_saved_history: Arc<AtomicU64>,
    pub relational_sink_failures: Arc<AtomicU64>,
    pub history_sink_failures: Arc<AtomicU64>,

    pub rows_skipped_scan: Arc<AtomicU64>,

    pub broadcasts: Arc<AtomicU64>,
    pub clients_evicted: Arc<AtomicU64>,
}
