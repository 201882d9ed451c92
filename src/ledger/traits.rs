use chrono::{DateTime, Utc};

use crate::notifications::NotificationRequest;

use super::error::Result;
use super::pruning::PruneStats;
use super::store::StoreStats;

/// Persistence seam for notification requests
///
/// Requests are addressed by `(email, secret)`. A request is staged as
/// unconfirmed and moves to the confirmed set at most once.
pub trait RequestStore: Send + Sync {
    /// Stage a request until its owner confirms it
    fn insert_unconfirmed(&self, request: &NotificationRequest) -> Result<()>;

    fn get_unconfirmed(&self, email: &str, secret: &str) -> Result<Option<NotificationRequest>>;

    fn get_confirmed(&self, email: &str, secret: &str) -> Result<Option<NotificationRequest>>;

    /// Move a request from unconfirmed to confirmed.
    ///
    /// Returns `None` when no unconfirmed request matches `(email, secret)`,
    /// which includes requests that were already confirmed. Of any number of
    /// concurrent calls for one pair, at most one returns `Some`.
    fn confirm(&self, email: &str, secret: &str) -> Result<Option<NotificationRequest>>;

    /// Drop unconfirmed requests created before `cutoff`
    fn prune_unconfirmed_before(&self, cutoff: DateTime<Utc>) -> Result<PruneStats>;

    /// Persist all pending writes to durable storage
    fn persist(&self) -> Result<()>;

    /// Entry counts per partition
    fn stats(&self) -> Result<StoreStats>;
}
