/// Fjall-based persistence for notification requests
///
/// Requests are keyed by `(email, secret)`: the address is the hash part and
/// the generated secret the range part. A request lives in the
/// `unconfirmed_notification_requests` partition until its confirmation link
/// is opened, then moves to `confirmed_notification_requests`.
///
/// Unconfirmed requests older than the configured retention are dropped by
/// [`RequestStore::prune_unconfirmed_before`].
///
/// ## Usage
///
/// ```rust,ignore
/// use podwatch::ledger::{NotificationStore, RequestStore};
///
/// let store = NotificationStore::open("data/notifications")?;
/// store.insert_unconfirmed(&request)?;
/// let confirmed = store.confirm("a@b.com", &request.secret)?;
/// ```

pub mod error;
pub mod partitions;
pub mod pruning;
pub mod store;
pub mod traits;

pub use error::{LedgerError, Result};
pub use pruning::{PruneStats, RETENTION_UNCONFIRMED_HOURS};
pub use store::{NotificationStore, StoreStats};
pub use traits::RequestStore;
