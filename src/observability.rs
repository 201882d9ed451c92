//! Request counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    searches_served: AtomicU64,
    searches_failed: AtomicU64,
    notifications_requested: AtomicU64,
    emails_failed: AtomicU64,
    confirmations: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_served(&self) {
        self.searches_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "searches_served", "Metric incremented");
    }

    pub fn search_failed(&self) {
        self.searches_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "searches_failed", "Metric incremented");
    }

    pub fn notification_requested(&self) {
        self.notifications_requested.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "notifications_requested", "Metric incremented");
    }

    pub fn email_failed(&self) {
        self.emails_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "emails_failed", "Metric incremented");
    }

    pub fn confirmation(&self) {
        self.confirmations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "confirmations", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches_served: self.searches_served.load(Ordering::Relaxed),
            searches_failed: self.searches_failed.load(Ordering::Relaxed),
            notifications_requested: self.notifications_requested.load(Ordering::Relaxed),
            emails_failed: self.emails_failed.load(Ordering::Relaxed),
            confirmations: self.confirmations.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub searches_served: u64,
    pub searches_failed: u64,
    pub notifications_requested: u64,
    pub emails_failed: u64,
    pub confirmations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::new();
        metrics.search_served();
        metrics.search_served();
        metrics.email_failed();
        metrics.confirmation();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.searches_served, 2);
        assert_eq!(snapshot.searches_failed, 0);
        assert_eq!(snapshot.emails_failed, 1);
        assert_eq!(snapshot.confirmations, 1);
    }
}
