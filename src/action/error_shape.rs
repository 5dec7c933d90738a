use crate::http::reason_phrase;
use serde_json::{json, Value};

/// The error payload layouts the backend is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorShape<'a> {
    Plain(&'a str),
    ModelState {
        message: String,
        model_state: &'a Value,
    },
    Exception {
        message: String,
        exception_message: String,
        exception_type: String,
        stack_trace: String,
    },
    Unrecognized,
}

type Matcher = for<'a> fn(&'a Value) -> Option<ErrorShape<'a>>;

// Order matters: a payload carrying both `error` and `ModelState` is Plain.
const MATCHERS: [Matcher; 3] = [plain, model_state, exception];

impl<'a> ErrorShape<'a> {
    pub fn detect(payload: &'a Value) -> ErrorShape<'a> {
        MATCHERS
            .iter()
            .find_map(|matcher| matcher(payload))
            .unwrap_or(ErrorShape::Unrecognized)
    }
}

fn plain(payload: &Value) -> Option<ErrorShape<'_>> {
    payload
        .get("error")
        .and_then(Value::as_str)
        .filter(|error| !error.is_empty())
        .map(ErrorShape::Plain)
}

fn model_state(payload: &Value) -> Option<ErrorShape<'_>> {
    payload
        .get("ModelState")
        .map(|model_state| ErrorShape::ModelState {
            message: text(payload, "Message"),
            model_state,
        })
}

fn exception(payload: &Value) -> Option<ErrorShape<'_>> {
    payload
        .get("ExceptionMessage")
        .map(|_| ErrorShape::Exception {
            message: text(payload, "Message"),
            exception_message: text(payload, "ExceptionMessage"),
            exception_type: text(payload, "ExceptionType"),
            stack_trace: text(payload, "StackTrace"),
        })
}

fn text(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(value)) => value.clone(),
        Some(other) => other.to_string(),
    }
}

/// Collapses an error response into the single line shown to the user.
pub fn normalize_error(status: u16, payload: &Value) -> String {
    match ErrorShape::detect(payload) {
        ErrorShape::Plain(error) => error.to_string(),
        ErrorShape::ModelState {
            message,
            model_state,
        } => format!("{} ({}) {}", message, status, model_state),
        ErrorShape::Exception {
            message,
            exception_message,
            exception_type,
            stack_trace,
        } => format!(
            "{} ({}) {} {} {}",
            message, status, exception_message, exception_type, stack_trace
        ),
        ErrorShape::Unrecognized => format!(
            "Unknown error occurred. Response was {}",
            full_response(status, payload)
        ),
    }
}

fn full_response(status: u16, payload: &Value) -> Value {
    json!({
        "data": payload,
        "status": status,
        "statusText": reason_phrase(status),
    })
}
