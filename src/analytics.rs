use bon::Builder;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// A telemetry event tagged with a category and label.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Builder)]
pub struct AnalyticsEvent {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub category: String,
    #[builder(into)]
    pub label: String,
}

impl AnalyticsEvent {
    pub fn new(name: &str, category: &str, label: &str) -> Self {
        AnalyticsEvent {
            name: name.to_string(),
            category: category.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitPolicy {
    #[default]
    Always,
    OnSuccess,
}

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("analytics sink unavailable: {0}")]
    Unavailable(String),
}

/// Receives events after an action resolves. Implementations must not block.
pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Writes events to the `analytics` tracing target.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        info!(
            target: "analytics",
            event = %event.name,
            category = %event.category,
            label = %event.label,
            "event"
        );
        Ok(())
    }
}

/// Hands events to a background consumer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<AnalyticsEvent>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<AnalyticsEvent>) -> Self {
        Self { sender }
    }
}

impl AnalyticsSink for ChannelSink {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        self.sender
            .send(event.clone())
            .map_err(|err| AnalyticsError::Unavailable(err.to_string()))
    }
}
