use bytes::Bytes;
use http_body_util::Full;

use crate::error::FrameworkError;

/// HTTP Response builder
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
}

/// Response type alias - allows using `?` operator for early returns
pub type Response = Result<HttpResponse, HttpResponse>;

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: String::new(),
            headers: Vec::new(),
        }
    }

    /// Create a response with a string body
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: vec![("Content-Type".to_string(), "text/plain; charset=utf-8".to_string())],
        }
    }

    /// Create a JSON response from a serde_json::Value
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Add a header to the response
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Wrap this response in Ok() for use as Response type
    pub fn ok(self) -> Response {
        Ok(self)
    }

    /// The status code
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// The body text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Look up a header (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON
    pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Convert to hyper response
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(self.status);

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "invalid response parts");
                let mut fallback = hyper::Response::new(Full::new(Bytes::from_static(
                    b"500 Internal Server Error",
                )));
                *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension trait for Response to enable method chaining on macros
pub trait ResponseExt {
    fn status(self, code: u16) -> Self;
    fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self;
}

impl ResponseExt for Response {
    fn status(self, code: u16) -> Self {
        self.map(|r| r.status(code))
    }

    fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|r| r.header(name, value))
    }
}

/// Auto-convert FrameworkError to HttpResponse
///
/// Enables the `?` operator in controller handlers. Server-side failures are
/// logged here and answered without leaking their details.
impl From<FrameworkError> for HttpResponse {
    fn from(err: FrameworkError) -> HttpResponse {
        let status = err.status_code();
        let message = if status >= 500 {
            tracing::error!(error = %err, status, "request failed");
            match status {
                503 => "Service unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            err.to_string()
        };

        HttpResponse::json(serde_json::json!({ "error": message })).status(status)
    }
}
