//! Client bindings for the JustJournal backend.
//!
//! Every user action (login, saving preferences, uploads) goes through
//! [`RemoteActionRunner`], which validates form fields, sends one request and
//! resolves to an [`ActionOutcome`]. Callers render the outcome; nothing in
//! this crate alerts or panics on a failed request.
//!
//! [`JournalClient`] wraps the runner with one method per backend call.

pub mod action;
pub mod analytics;
pub mod config;
pub mod error;
pub mod http;
pub mod journal;

#[cfg(test)]
mod testing;

pub use action::{ActionOutcome, ActionRequest, FieldRule, RemoteActionRunner, UploadRequest};
pub use analytics::{AnalyticsEvent, AnalyticsSink, EmitPolicy};
pub use config::ClientConfig;
pub use error::ClientError;
pub use journal::JournalClient;

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
