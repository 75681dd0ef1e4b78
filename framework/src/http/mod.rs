mod body;
mod request;
mod response;

pub use body::{collect_body, parse_json};
pub use request::Request;
pub use response::{HttpResponse, Response, ResponseExt};

/// Error type for missing route parameters
#[derive(Debug)]
pub struct ParamError {
    pub param_name: String,
}

impl From<ParamError> for crate::error::FrameworkError {
    fn from(err: ParamError) -> crate::error::FrameworkError {
        crate::error::FrameworkError::ParamError {
            param_name: err.param_name,
        }
    }
}

impl From<ParamError> for HttpResponse {
    fn from(err: ParamError) -> HttpResponse {
        HttpResponse::from(crate::error::FrameworkError::from(err))
    }
}

/// Create a text response
pub fn text(body: impl Into<String>) -> Response {
    Ok(HttpResponse::text(body))
}

/// Create a JSON response from a serde_json::Value
pub fn json(body: serde_json::Value) -> Response {
    Ok(HttpResponse::json(body))
}

/// Build a JSON `Response` from `serde_json::json!` syntax
///
/// ```rust,ignore
/// json_response!({ "status": "ok" })
/// ```
#[macro_export]
macro_rules! json_response {
    ($($json:tt)+) => {
        $crate::http::json($crate::serde_json::json!($($json)+))
    };
}
