//! HTTP surface of podwatch
//!
//! Handlers in [`services`] speak the proxy-event contract ([`ApiEvent`] in,
//! [`ApiResponse`] out); the axum adapters in `server` translate HTTP requests
//! into that shape.

mod error;
pub mod event;
pub mod models;
mod server;
pub mod services;
pub mod state;
pub(crate) mod utils;
mod validation;

pub use error::ApiError;
pub use event::{ApiEvent, ApiResponse};
pub use server::{RunOptions, router, run};
pub use state::AppState;
