use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use tracing::{debug, info};

use crate::notifications::NotificationRequest;

use super::error::Result;
use super::partitions::{CONFIRMED_PARTITION, UNCONFIRMED_PARTITION, encode_request_key};
use super::pruning::{PruneStats, prune_unconfirmed};
use super::traits::RequestStore;

/// Fjall-backed store of notification requests keyed by `(email, secret)`
#[derive(Clone)]
pub struct NotificationStore {
    keyspace: Keyspace,
    unconfirmed: PartitionHandle,
    confirmed: PartitionHandle,
    confirm_lock: Arc<Mutex<()>>,
}

impl NotificationStore {
    /// Open or create a store at the given path.
    ///
    /// Creates both request partitions if they do not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening notification store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        let unconfirmed =
            keyspace.open_partition(UNCONFIRMED_PARTITION, PartitionCreateOptions::default())?;
        let confirmed =
            keyspace.open_partition(CONFIRMED_PARTITION, PartitionCreateOptions::default())?;

        info!("Notification store opened successfully");
        Ok(Self {
            keyspace,
            unconfirmed,
            confirmed,
            confirm_lock: Arc::new(Mutex::new(())),
        })
    }
}

impl RequestStore for NotificationStore {
    fn insert_unconfirmed(&self, request: &NotificationRequest) -> Result<()> {
        let key = encode_request_key(&request.email, &request.secret);
        let value = serde_json::to_vec(request)?;
        self.unconfirmed.insert(key, value)?;
        debug!(email = %request.email, "Staged unconfirmed notification request");
        Ok(())
    }

    fn get_unconfirmed(&self, email: &str, secret: &str) -> Result<Option<NotificationRequest>> {
        read_request(&self.unconfirmed, email, secret)
    }

    fn get_confirmed(&self, email: &str, secret: &str) -> Result<Option<NotificationRequest>> {
        read_request(&self.confirmed, email, secret)
    }

    fn confirm(&self, email: &str, secret: &str) -> Result<Option<NotificationRequest>> {
        // Held across the read and the commit so a pair moves only once
        let _guard = self
            .confirm_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let key = encode_request_key(email, secret);
        let Some(value) = self.unconfirmed.get(&key)? else {
            return Ok(None);
        };
        let request: NotificationRequest = serde_json::from_slice(&value)?;

        let mut batch = self.keyspace.batch();
        batch.insert(&self.confirmed, key.clone(), value.to_vec());
        batch.remove(&self.unconfirmed, key);
        batch.commit()?;

        debug!(email, "Confirmed notification request");
        Ok(Some(request))
    }

    fn prune_unconfirmed_before(&self, cutoff: DateTime<Utc>) -> Result<PruneStats> {
        prune_unconfirmed(&self.unconfirmed, cutoff)
    }

    fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }

    fn stats(&self) -> Result<StoreStats> {
        let mut unconfirmed_count = 0;
        let mut confirmed_count = 0;

        for item in self.unconfirmed.iter() {
            item?;
            unconfirmed_count += 1;
        }

        for item in self.confirmed.iter() {
            item?;
            confirmed_count += 1;
        }

        Ok(StoreStats {
            unconfirmed_count,
            confirmed_count,
        })
    }
}

fn read_request(
    partition: &PartitionHandle,
    email: &str,
    secret: &str,
) -> Result<Option<NotificationRequest>> {
    match partition.get(encode_request_key(email, secret))? {
        Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub unconfirmed_count: usize,
    pub confirmed_count: usize,
}
