use crate::action::validation::ValidationFailure;
use crate::analytics::{AnalyticsEvent, EmitPolicy};
use crate::http::{FilePart, HttpMethod, ReqParam};
use bon::Builder;
use serde::Serialize;
use serde_json::Value;

/// Payload-level marker that distinguishes a real success from a 2xx
/// response carrying a rejection, e.g. `status == "JJ.LOGIN.OK"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessSentinel {
    pub field: String,
    pub expected: Value,
}

impl SuccessSentinel {
    pub fn new(field: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
        }
    }

    pub fn matches(&self, payload: &Value) -> bool {
        payload.get(&self.field) == Some(&self.expected)
    }
}

/// One user-triggered call. Built once, consumed by the runner.
#[derive(Debug, Clone, Builder)]
pub struct ActionRequest {
    pub(crate) method: HttpMethod,
    #[builder(into)]
    pub(crate) endpoint: String,
    #[builder(default)]
    pub(crate) path_params: Vec<ReqParam>,
    #[builder(default)]
    pub(crate) query_params: Vec<ReqParam>,
    pub(crate) payload: Option<Value>,
    /// Used in the transport failure message: "<action> information was invalid".
    #[builder(into)]
    pub(crate) action: Option<String>,
    pub(crate) success_sentinel: Option<SuccessSentinel>,
    #[builder(into)]
    pub(crate) failure_message: Option<String>,
    pub(crate) analytics: Option<AnalyticsEvent>,
    #[builder(default)]
    pub(crate) emit_policy: EmitPolicy,
}

impl ActionRequest {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub(crate) fn transport_failure_message(&self, transport_error: &str) -> String {
        match (&self.failure_message, &self.action) {
            (Some(message), _) => message.clone(),
            (None, Some(action)) => format!("{} information was invalid. Please try again", action),
            (None, None) => transport_error.to_string(),
        }
    }
}

/// A multipart file upload.
#[derive(Debug, Clone, Builder)]
pub struct UploadRequest {
    #[builder(into)]
    pub(crate) endpoint: String,
    #[builder(default)]
    pub(crate) fields: Vec<ReqParam>,
    pub(crate) file: FilePart,
    pub(crate) analytics: Option<AnalyticsEvent>,
    #[builder(default)]
    pub(crate) emit_policy: EmitPolicy,
}

impl UploadRequest {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// What the presentation layer renders after an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ActionOutcome {
    Success {
        data: Value,
    },
    ValidationFailure {
        message: String,
    },
    RemoteFailure {
        http_status: Option<u16>,
        message: String,
        raw_payload: Option<Value>,
    },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ActionOutcome::Success { data } => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Value> {
        match self {
            ActionOutcome::Success { data } => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ActionOutcome::Success { .. } => None,
            ActionOutcome::ValidationFailure { message } => Some(message),
            ActionOutcome::RemoteFailure { message, .. } => Some(message),
        }
    }
}

impl From<ValidationFailure> for ActionOutcome {
    fn from(failure: ValidationFailure) -> Self {
        ActionOutcome::ValidationFailure {
            message: failure.message,
        }
    }
}
