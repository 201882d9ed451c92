use std::sync::Arc;

use crate::config::Config;
use crate::email::EmailSender;
use crate::ledger::{NotificationStore, RequestStore};
use crate::notifications::{RandomTokenGenerator, TokenGenerator};
use crate::observability::Metrics;
use crate::search::SearchClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub search: Arc<dyn SearchClient>,
    pub email: Arc<dyn EmailSender>,
    pub tokens: Arc<dyn TokenGenerator>,
    pub store: Arc<dyn RequestStore>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        search: Arc<dyn SearchClient>,
        email: Arc<dyn EmailSender>,
        store: NotificationStore,
    ) -> Self {
        Self {
            config: Arc::new(config),
            search,
            email,
            tokens: Arc::new(RandomTokenGenerator),
            store: Arc::new(store),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Replace the secret source, e.g. with a fixed token
    pub fn with_token_generator(mut self, tokens: Arc<dyn TokenGenerator>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Replace the request store, e.g. with one that fails
    pub fn with_store(mut self, store: Arc<dyn RequestStore>) -> Self {
        self.store = store;
        self
    }
}
