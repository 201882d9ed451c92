/// Retention for unconfirmed notification requests
use chrono::{DateTime, Utc};
use fjall::PartitionHandle;
use tracing::{info, warn};

use super::error::Result;
use super::partitions::decode_request_key;
use crate::notifications::NotificationRequest;

/// Default age after which an unconfirmed request is discarded
pub const RETENTION_UNCONFIRMED_HOURS: u64 = 72;

/// Pruning statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneStats {
    pub unconfirmed_pruned: usize,
    pub malformed_skipped: usize,
}

/// Remove unconfirmed requests created before `cutoff`
pub fn prune_unconfirmed(
    unconfirmed: &PartitionHandle,
    cutoff: DateTime<Utc>,
) -> Result<PruneStats> {
    let mut stats = PruneStats::default();
    let mut expired = Vec::new();

    for item in unconfirmed.iter() {
        let (key, value) = item?;

        if decode_request_key(&key).is_none() {
            warn!(key = %String::from_utf8_lossy(&key), "Skipping malformed request key");
            stats.malformed_skipped += 1;
            continue;
        }

        let request: NotificationRequest = match serde_json::from_slice(&value) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable request record");
                stats.malformed_skipped += 1;
                continue;
            }
        };

        if request.created_at < cutoff {
            expired.push(key);
        }
    }

    for key in expired {
        unconfirmed.remove(key)?;
        stats.unconfirmed_pruned += 1;
    }

    info!(
        pruned = stats.unconfirmed_pruned,
        skipped = stats.malformed_skipped,
        "Pruned unconfirmed notification requests"
    );
    Ok(stats)
}
