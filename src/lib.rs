pub mod api;
pub mod config;
pub mod email;
pub mod ledger;
pub mod notifications;
pub mod observability;
pub mod search;
