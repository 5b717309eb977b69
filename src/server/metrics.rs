use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lock-free counters describing what the catalog has served so far.
#[derive(Debug, Clone, Default)]
pub struct CatalogMetrics {
    standard_fetches: Arc<AtomicU64>,
    delayed_fetches: Arc<AtomicU64>,
    failed_fetches: Arc<AtomicU64>,
    images_added: Arc<AtomicU64>,
    broadcasts_sent: Arc<AtomicU64>, // One per delivered subscriber message
}

/// Point-in-time copy of [`CatalogMetrics`], serialized by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub standard_fetches: u64,
    pub delayed_fetches: u64,
    pub failed_fetches: u64,
    pub images_added: u64,
    pub broadcasts_sent: u64,
}

impl CatalogMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_standard_fetches(&self) {
        self.standard_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_delayed_fetches(&self) {
        self.delayed_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed_fetches(&self) {
        self.failed_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_images_added(&self) {
        self.images_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_broadcasts_sent(&self, delivered: u64) {
        self.broadcasts_sent.fetch_add(delivered, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            standard_fetches: self.standard_fetches.load(Ordering::Relaxed),
            delayed_fetches: self.delayed_fetches.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
            images_added: self.images_added.load(Ordering::Relaxed),
            broadcasts_sent: self.broadcasts_sent.load(Ordering::Relaxed),
        }
    }
}
