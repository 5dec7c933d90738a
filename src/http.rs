use crate::config::ClientConfig;
use crate::error::ClientError;
use bon::Builder;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct ReqParam {
    pub key: String,
    pub value: String,
}

impl ReqParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        ReqParam {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReqBody {
    pub value: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub path_params: Vec<ReqParam>,
    pub query_params: Vec<ReqParam>,
}

impl Endpoint {
    /// Path parameters are written as `:name` in `path` and keyed by `name`.
    pub fn new(
        method: HttpMethod,
        path: &str,
        path_params: Vec<ReqParam>,
        query_params: Vec<ReqParam>,
    ) -> Endpoint {
        Endpoint {
            method,
            path: path.to_string(),
            path_params,
            query_params,
        }
    }

    /// Appends the path to `base_url` one segment at a time. Substituted
    /// values always stay a single segment: `/`, `?`, `#` and `%` are
    /// percent-encoded, and `.`, `..` or empty values are rejected.
    pub fn to_url(&self, base_url: &Url) -> Result<Url, HttpError> {
        let mut url = base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| HttpError::Io(format!("base url {} cannot carry a path", base_url)))?;
            segments.pop_if_empty();
            for segment in self.path.split('/').filter(|segment| !segment.is_empty()) {
                let value = match segment.strip_prefix(':') {
                    Some(key) => self.path_param(key)?,
                    None => segment,
                };
                if matches!(value, "" | "." | "..") {
                    return Err(HttpError::Io(format!(
                        "invalid path segment {:?} for {}",
                        value, self.path
                    )));
                }
                segments.push(value);
            }
        }
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            self.query_params.iter().for_each(|param| {
                pairs.append_pair(&param.key, &param.value);
            });
        }
        Ok(url)
    }

    fn path_param(&self, key: &str) -> Result<&str, HttpError> {
        self.path_params
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
            .ok_or_else(|| HttpError::Io(format!("missing path parameter {} for {}", key, self.path)))
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub endpoint: Endpoint,
    pub req_body: ReqBody,
    pub content_type: String,
}

impl HttpRequest {
    pub fn new(endpoint: Endpoint, req_body: ReqBody, content_type: String) -> HttpRequest {
        HttpRequest {
            endpoint,
            req_body,
            content_type,
        }
    }

    pub fn json(endpoint: Endpoint, body: Option<Value>) -> HttpRequest {
        HttpRequest::new(
            endpoint,
            ReqBody { value: body },
            "application/json".to_string(),
        )
    }
}

/// A file carried by a multipart upload.
#[derive(Debug, Clone, Builder)]
pub struct FilePart {
    #[builder(into)]
    pub file_name: String,
    #[builder(into, default = "application/octet-stream".to_string())]
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MultipartRequest {
    pub endpoint: Endpoint,
    pub fields: Vec<ReqParam>,
    pub file: FilePart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResBody<T> {
    pub value: T,
}

impl<T> ResBody<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResult<T> {
    pub res_body: ResBody<T>,
    pub status_code: u16,
}

impl<T> HttpResult<T> {
    pub fn new(res_body: ResBody<T>, status_code: u16) -> Self {
        Self {
            res_body,
            status_code,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum HttpError {
    #[error("request failed with status {0}")]
    Status(u16, StatusError),
    #[error("{0}")]
    Io(String),
}

#[derive(Clone, PartialEq, Debug)]
pub enum StatusError {
    ClientError(Value),
    ServerError(Value),
}

impl StatusError {
    pub fn into_body(self) -> Value {
        match self {
            StatusError::ClientError(body) => body,
            StatusError::ServerError(body) => body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
            HttpMethod::PUT => Method::PUT,
            HttpMethod::DELETE => Method::DELETE,
        }
    }
}

/// Shared transport. Cloning is cheap; clones reuse the same connection pool
/// and cookie jar, so a session established by login carries over.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResult<Value>, HttpError> {
        info!("will execute http request!");
        let req = self.build_reqwest(request)?;
        let result = req.send().await;
        self.handle_response(result).await
    }

    /// Sends a multipart request whose file part is streamed in chunks. Every
    /// chunk handed to the transport reports the raw percentage sent so far
    /// on `progress`.
    pub async fn upload(
        &self,
        request: MultipartRequest,
        progress: UnboundedSender<u64>,
    ) -> Result<HttpResult<Value>, HttpError> {
        info!("will execute multipart upload!");
        let url = request.endpoint.to_url(&self.base_url)?;
        info!("url: {}", url);
        let file = request.file;
        let total = file.bytes.len() as u64;
        let chunks: Vec<Vec<u8>> = file
            .bytes
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(|chunk| chunk.to_vec())
            .collect();
        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            // the receiver may already be gone; progress is advisory
            let _ = progress.send(percent(sent, total));
            Ok::<Vec<u8>, std::io::Error>(chunk)
        }));
        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(|err| HttpError::Io(err.to_string()))?;
        let form = request
            .fields
            .into_iter()
            .fold(Form::new(), |form, field| form.text(field.key, field.value))
            .part("file", part);

        let result = self
            .client
            .request(request.endpoint.method.into(), url)
            .multipart(form)
            .send()
            .await;
        self.handle_response(result).await
    }

    async fn handle_response(
        &self,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<HttpResult<Value>, HttpError> {
        match result {
            Ok(response) => {
                let status_code = response.status();
                info!("http request executed, status_code: {}", status_code);
                let text = response
                    .text()
                    .await
                    .map_err(|err| HttpError::Io(err.to_string()))?;
                let body = parse_body(&text);
                if status_code.is_success() {
                    Ok(HttpResult::new(ResBody::new(body), status_code.as_u16()))
                } else if status_code.is_client_error() {
                    info!("http request failed: {}", text);
                    Err(HttpError::Status(
                        status_code.as_u16(),
                        StatusError::ClientError(body),
                    ))
                } else {
                    info!("http request failed: {}", text);
                    Err(HttpError::Status(
                        status_code.as_u16(),
                        StatusError::ServerError(body),
                    ))
                }
            }
            Err(error) => {
                info!("http request failed: {}", error);
                Err(HttpError::Io(error.to_string()))
            }
        }
    }

    fn build_reqwest(&self, request: HttpRequest) -> Result<RequestBuilder, HttpError> {
        let endpoint = request.endpoint;
        let content_type = request.content_type;
        let url = endpoint.to_url(&self.base_url)?;
        info!("url: {}", url);
        info!("content type: {}", content_type);
        info!("method: {}", endpoint.method);

        let mut req = self.client.request(endpoint.method.into(), url);

        if let Some(body) = &request.req_body.value {
            info!("request body: {}", body);
            if content_type.contains("application/x-www-form-urlencoded") {
                req = req.form(body);
            } else {
                req = req.json(body);
            }
        }
        Ok(req)
    }
}

pub fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    Url::parse(raw).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    }
}

fn percent(sent: u64, total: u64) -> u64 {
    if total == 0 {
        100
    } else {
        sent.saturating_mul(100) / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact_url(id: &str) -> Result<Url, HttpError> {
        let base = parse_base_url("http://localhost:8080").unwrap();
        Endpoint::new(
            HttpMethod::GET,
            "/api/contact/:id",
            vec![ReqParam::new("id", id)],
            vec![],
        )
        .to_url(&base)
    }

    #[test]
    fn endpoint_substitutes_path_params() {
        let url = contact_url("alice").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/contact/alice");
    }

    #[test]
    fn path_params_stay_in_one_segment() {
        let url = contact_url("../account/mallory").unwrap();
        assert_eq!(url.path(), "/api/contact/..%2Faccount%2Fmallory");
        assert_eq!(url.query(), None);

        let url = contact_url("bob?x=1#top").unwrap();
        assert_eq!(url.path(), "/api/contact/bob%3Fx=1%23top");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = contact_url("50%25").unwrap();
        assert_eq!(url.path(), "/api/contact/50%2525");
    }

    #[test]
    fn dot_segments_and_empty_params_are_rejected() {
        for id in ["..", ".", ""] {
            assert!(matches!(contact_url(id), Err(HttpError::Io(_))), "{:?}", id);
        }
    }

    #[test]
    fn missing_path_param_is_an_error() {
        let base = parse_base_url("http://localhost:8080").unwrap();
        let endpoint = Endpoint::new(HttpMethod::GET, "/api/account/:id", vec![], vec![]);
        assert!(matches!(endpoint.to_url(&base), Err(HttpError::Io(_))));
    }

    #[test]
    fn endpoint_url_keeps_base_path_and_query() {
        let base = parse_base_url("http://localhost:8080/jj/").unwrap();
        let endpoint = Endpoint::new(
            HttpMethod::GET,
            "/api/entry/:username/recent",
            vec![ReqParam::new("username", "bob")],
            vec![ReqParam::new("page", "2")],
        );
        let url = endpoint.to_url(&base).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/jj/api/entry/bob/recent?page=2");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = parse_base_url("not a url");
        assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn body_parsing_tolerates_empty_and_plain_text() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_body("Forbidden"), json!("Forbidden"));
    }

    #[test]
    fn method_displays_uppercase() {
        assert_eq!(HttpMethod::DELETE.to_string(), "DELETE");
    }

    #[test]
    fn percent_handles_empty_files() {
        assert_eq!(percent(0, 0), 100);
        assert_eq!(percent(50, 200), 25);
    }
}
