use super::body::parse_json;
use super::ParamError;
use crate::error::FrameworkError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;

/// HTTP request with its body already collected
///
/// The server reads the body before dispatch, so handlers (and tests) work
/// with a plain `http::Request<Bytes>`.
pub struct Request {
    inner: http::Request<Bytes>,
    params: HashMap<String, String>,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self {
            inner,
            params: HashMap::new(),
        }
    }

    /// Shorthand for a bodiless request, mostly for tests
    pub fn get(uri: &str) -> Self {
        let mut inner = http::Request::new(Bytes::new());
        *inner.method_mut() = http::Method::GET;
        *inner.uri_mut() = uri.parse().unwrap_or_default();
        Self::new(inner)
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Get the request method
    pub fn method(&self) -> &http::Method {
        self.inner.method()
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Get a route parameter by name (e.g., /users/{id})
    /// Returns Err(ParamError) if the parameter is missing, enabling use of `?` operator
    pub fn param(&self, name: &str) -> Result<&str, ParamError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| ParamError {
                param_name: name.to_string(),
            })
    }

    /// Get a route parameter parsed into `T`
    ///
    /// A missing parameter is a `ParamError`, an unparsable one a
    /// `ParamParse` error, both answered with 400.
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, FrameworkError> {
        let raw = self.param(name)?;
        raw.parse()
            .map_err(|_| FrameworkError::param_parse(raw, std::any::type_name::<T>()))
    }

    /// Get all route parameters
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Raw body bytes
    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    /// Parse the request body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_json(self.inner.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Payload {
        name: String,
    }

    fn with_id(id: &str) -> Request {
        Request::get("/users/x").with_params(HashMap::from([("id".to_string(), id.to_string())]))
    }

    #[test]
    fn test_param_as_parses() {
        assert_eq!(with_id("7").param_as::<i32>("id").unwrap(), 7);
    }

    #[test]
    fn test_param_as_rejects_garbage() {
        let err = with_id("seven").param_as::<i32>("id").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_missing_param() {
        let err = Request::get("/").param_as::<i32>("id").unwrap_err();
        assert!(matches!(err, FrameworkError::ParamError { .. }));
    }

    #[test]
    fn test_json_body() {
        let inner = http::Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Bytes::from_static(br#"{"name":"Ada"}"#))
            .unwrap();
        let req = Request::new(inner);

        assert_eq!(req.content_type(), Some("application/json"));
        assert_eq!(req.json::<Payload>().unwrap().name, "Ada");
        assert_eq!(req.path(), "/users");
    }
}
