use crate::action::runner::RemoteActionRunner;
use crate::analytics::{AnalyticsError, AnalyticsEvent, AnalyticsSink};
use crate::config::ClientConfig;
use crate::http::ApiClient;
use axum::Router;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port and returns its base url.
pub(crate) async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base url nothing is listening on.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub(crate) fn runner_for(base_url: &str) -> RemoteActionRunner {
    runner_with_timeout(base_url, Duration::from_secs(5))
}

pub(crate) fn runner_with_timeout(base_url: &str, timeout: Duration) -> RemoteActionRunner {
    let config = ClientConfig::builder()
        .base_url(base_url)
        .timeout(timeout)
        .build();
    RemoteActionRunner::new(ApiClient::new(&config).unwrap())
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    /// Event names recorded so far, once spawned emissions had a chance to run.
    pub async fn names(&self) -> Vec<String> {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.name.clone())
            .collect()
    }
}

impl AnalyticsSink for RecordingSink {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub(crate) struct FailingSink;

impl AnalyticsSink for FailingSink {
    fn emit(&self, _event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Unavailable("offline".to_string()))
    }
}

pub(crate) struct PanickingSink;

impl AnalyticsSink for PanickingSink {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        panic!("sink blew up on {}", event.name)
    }
}

pub(crate) fn recording_sink() -> Arc<RecordingSink> {
    Arc::new(RecordingSink::default())
}
