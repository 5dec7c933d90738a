use crate::action::error_shape::normalize_error;
use crate::action::model::{ActionOutcome, ActionRequest, UploadRequest};
use crate::action::progress::ProgressTracker;
use crate::action::validation::{validate, FieldRule, ValidationFailure};
use crate::analytics::{AnalyticsEvent, AnalyticsSink, EmitPolicy};
use crate::http::{ApiClient, Endpoint, HttpError, HttpMethod, HttpRequest, HttpResult, MultipartRequest};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// Runs one action per call and folds every result, including transport
/// failures, into an `ActionOutcome`.
#[derive(Clone)]
pub struct RemoteActionRunner {
    client: Arc<ApiClient>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
}

impl RemoteActionRunner {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client: Arc::new(client),
            analytics: None,
        }
    }

    pub fn with_analytics(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = Some(sink);
        self
    }

    pub fn validate(
        &self,
        fields: &HashMap<String, String>,
        rules: &[FieldRule],
    ) -> Result<(), ValidationFailure> {
        validate(fields, rules)
    }

    /// Validates `fields` first; the request is only sent when every rule passes.
    pub async fn submit(
        &self,
        fields: &HashMap<String, String>,
        rules: &[FieldRule],
        request: ActionRequest,
    ) -> ActionOutcome {
        match validate(fields, rules) {
            Ok(()) => self.execute(request).await,
            Err(failure) => {
                info!("validation failed for {}: {}", request.endpoint, failure);
                failure.into()
            }
        }
    }

    pub async fn execute(&self, request: ActionRequest) -> ActionOutcome {
        let span = info_span!(
            "action",
            request_id = %Uuid::new_v4(),
            method = %request.method,
            endpoint = %request.endpoint
        );
        async {
            let endpoint = Endpoint::new(
                request.method,
                &request.endpoint,
                request.path_params.clone(),
                request.query_params.clone(),
            );
            let result = self
                .client
                .execute(HttpRequest::json(endpoint, request.payload.clone()))
                .await;
            let outcome = resolve_outcome(&request, result);
            info!("action resolved, success: {}", outcome.is_success());
            self.emit(request.analytics.as_ref(), request.emit_policy, &outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Uploads a file, calling `observer` with the clamped percentage sent so
    /// far before the outcome resolves.
    pub async fn upload<F>(&self, request: UploadRequest, mut observer: F) -> ActionOutcome
    where
        F: FnMut(u8),
    {
        let span = info_span!(
            "upload",
            request_id = %Uuid::new_v4(),
            endpoint = %request.endpoint
        );
        async {
            let UploadRequest {
                endpoint,
                fields,
                file,
                analytics,
                emit_policy,
            } = request;
            let multipart = MultipartRequest {
                endpoint: Endpoint::new(HttpMethod::POST, &endpoint, vec![], vec![]),
                fields,
                file,
            };
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut tracker = ProgressTracker::new();
            let send = self.client.upload(multipart, tx);
            tokio::pin!(send);
            let result = loop {
                tokio::select! {
                    biased;
                    Some(raw) = rx.recv() => observer(tracker.observe(raw)),
                    result = &mut send => break result,
                }
            };
            while let Ok(raw) = rx.try_recv() {
                observer(tracker.observe(raw));
            }
            let outcome = resolve_upload(result);
            info!("upload resolved, success: {}", outcome.is_success());
            self.emit(analytics.as_ref(), emit_policy, &outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    fn emit(&self, event: Option<&AnalyticsEvent>, policy: EmitPolicy, outcome: &ActionOutcome) {
        let (Some(sink), Some(event)) = (&self.analytics, event) else {
            return;
        };
        if policy == EmitPolicy::OnSuccess && !outcome.is_success() {
            return;
        }
        // a sink panic ends only this task
        let sink = Arc::clone(sink);
        let event = event.clone();
        tokio::spawn(async move {
            if let Err(err) = sink.emit(&event) {
                debug!("analytics event {} dropped: {}", event.name, err);
            }
        });
    }
}

fn resolve_outcome(
    request: &ActionRequest,
    result: Result<HttpResult<Value>, HttpError>,
) -> ActionOutcome {
    match result {
        Ok(http_result) => {
            let status = http_result.status_code;
            let data = http_result.res_body.value;
            match &request.success_sentinel {
                Some(sentinel) if !sentinel.matches(&data) => {
                    let message = request
                        .failure_message
                        .clone()
                        .unwrap_or_else(|| normalize_error(status, &data));
                    ActionOutcome::RemoteFailure {
                        http_status: Some(status),
                        message,
                        raw_payload: Some(data),
                    }
                }
                _ => ActionOutcome::Success { data },
            }
        }
        Err(HttpError::Status(status, status_error)) => {
            let body = status_error.into_body();
            ActionOutcome::RemoteFailure {
                http_status: Some(status),
                message: normalize_error(status, &body),
                raw_payload: Some(body),
            }
        }
        Err(HttpError::Io(error)) => ActionOutcome::RemoteFailure {
            http_status: None,
            message: request.transport_failure_message(&error),
            raw_payload: None,
        },
    }
}

fn resolve_upload(result: Result<HttpResult<Value>, HttpError>) -> ActionOutcome {
    match result {
        Ok(http_result) => ActionOutcome::Success {
            data: http_result.res_body.value,
        },
        Err(HttpError::Status(status, status_error)) => {
            let body = status_error.into_body();
            let text = match &body {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            ActionOutcome::RemoteFailure {
                http_status: Some(status),
                message: format!("{}: {}", status, text),
                raw_payload: Some(body),
            }
        }
        Err(HttpError::Io(error)) => ActionOutcome::RemoteFailure {
            http_status: None,
            message: error,
            raw_payload: None,
        },
    }
}
