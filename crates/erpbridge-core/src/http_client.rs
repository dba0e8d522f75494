use std::collections::{BTreeMap, VecDeque};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// HTTP methods the gateway issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Authentication applied to outgoing ERP requests.
#[derive(Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    BearerToken(String),
    Basic { username: String, password: String },
    /// Pre-established session cookie, e.g. SAP B1 `B1SESSION=...`.
    Cookie(String),
}

impl HttpAuth {
    pub fn apply(&self, headers: &mut BTreeMap<String, String>) {
        match self {
            Self::None => {}
            Self::BearerToken(token) => {
                headers.insert(String::from("authorization"), format!("Bearer {token}"));
            }
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                headers.insert(String::from("authorization"), format!("Basic {encoded}"));
            }
            Self::Cookie(cookie) => {
                headers.insert(String::from("cookie"), cookie.clone());
            }
        }
    }
}

impl std::fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::None => "None",
            Self::BearerToken(_) => "BearerToken(***)",
            Self::Basic { .. } => "Basic(***)",
            Self::Cookie(_) => "Cookie(***)",
        };
        f.write_str(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: 10_000,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// JSON body with the matching content type.
    pub fn with_json_body(self, body: impl Into<String>) -> Self {
        let mut request = self.with_header("content-type", "application/json");
        request.body = Some(body.into());
        request
    }

    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        auth.apply(&mut self.headers);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Throttling and server-side failures are worth another attempt.
    pub const fn is_retryable_status(&self) -> bool {
        self.status == 429 || self.status >= 500
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
    retryable: bool,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Transport seam between the gateway and the network.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a>;
}

/// reqwest-backed transport for live ERP endpoints.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("erpbridge/", env!("CARGO_PKG_VERSION")))
                    .cookie_store(true)
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            };

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            builder = builder.timeout(std::time::Duration::from_millis(request.timeout_ms));
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else if e.is_builder() {
                    HttpError::non_retryable(format!("invalid request: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {e}")))?;

            Ok(HttpResponse { status, body })
        })
    }
}

/// Offline transport that serves canned responses and records every request.
///
/// Responses registered for a URL suffix are served in order; the last one
/// repeats. Unmatched requests get the fallback (`200 {}` unless replaced).
#[derive(Debug, Clone)]
pub struct StaticHttpClient {
    state: Arc<Mutex<StaticState>>,
}

#[derive(Debug)]
struct StaticState {
    routes: Vec<(String, VecDeque<Result<HttpResponse, HttpError>>)>,
    fallback: Result<HttpResponse, HttpError>,
    requests: Vec<HttpRequest>,
}

impl StaticHttpClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StaticState {
                routes: Vec::new(),
                fallback: Ok(HttpResponse::ok_json("{}")),
                requests: Vec::new(),
            })),
        }
    }

    pub fn with_response(self, url_suffix: impl Into<String>, response: HttpResponse) -> Self {
        self.push(url_suffix.into(), Ok(response));
        self
    }

    pub fn with_error(self, url_suffix: impl Into<String>, error: HttpError) -> Self {
        self.push(url_suffix.into(), Err(error));
        self
    }

    pub fn with_fallback(self, response: Result<HttpResponse, HttpError>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.fallback = response;
        }
        self
    }

    /// Requests executed so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    fn push(&self, suffix: String, response: Result<HttpResponse, HttpError>) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        match state.routes.iter_mut().find(|(route, _)| *route == suffix) {
            Some((_, queue)) => queue.push_back(response),
            None => state.routes.push((suffix, VecDeque::from([response]))),
        }
    }

    fn respond(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| HttpError::non_retryable("static client state is poisoned"))?;

        let path = request.url.split('?').next().unwrap_or_default().to_owned();
        state.requests.push(request);

        let routed = state
            .routes
            .iter_mut()
            .filter(|(suffix, _)| path.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            });

        match routed.flatten() {
            Some(response) => response,
            None => state.fallback.clone(),
        }
    }
}

impl Default for StaticHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for StaticHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        let response = self.respond(request);
        Box::pin(async move { response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_auth_populates_authorization_header() {
        let request = HttpRequest::get("https://erp.example.test/Customers")
            .with_auth(&HttpAuth::BearerToken(String::from("token-123")));

        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer token-123")
        );
    }

    #[test]
    fn basic_auth_is_base64_encoded() {
        let request = HttpRequest::get("https://erp.example.test/Customers").with_auth(
            &HttpAuth::Basic {
                username: String::from("Aladdin"),
                password: String::from("open sesame"),
            },
        );

        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );
    }

    #[test]
    fn debug_output_hides_credentials() {
        let auth = HttpAuth::BearerToken(String::from("secret-token"));
        assert!(!format!("{auth:?}").contains("secret-token"));
    }

    #[tokio::test]
    async fn static_client_serves_queued_responses_then_repeats_last() {
        let client = StaticHttpClient::new()
            .with_response("/Warehouses", HttpResponse::ok_json(r#"{"value":[1]}"#))
            .with_response("/Warehouses", HttpResponse::new(503, "busy"));

        let first = client
            .execute(HttpRequest::get("https://erp.test/Warehouses"))
            .await
            .expect("first");
        let second = client
            .execute(HttpRequest::get("https://erp.test/Warehouses?$top=5"))
            .await
            .expect("second");
        let third = client
            .execute(HttpRequest::get("https://erp.test/Warehouses"))
            .await
            .expect("third");

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 503);
        assert_eq!(third.status, 503);
        assert_eq!(client.requests().len(), 3);
    }

    #[tokio::test]
    async fn static_client_falls_back_for_unknown_routes() {
        let client = StaticHttpClient::new();
        let response = client
            .execute(HttpRequest::post("https://erp.test/anything").with_json_body("{}"))
            .await
            .expect("fallback");

        assert_eq!(response, HttpResponse::ok_json("{}"));
        let recorded = client.requests();
        assert_eq!(recorded[0].method, HttpMethod::Post);
        assert_eq!(
            recorded[0].headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }
}
