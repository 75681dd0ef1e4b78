//! Body collection and parsing for HTTP requests

use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

/// Collect the full body from an Incoming stream, failing above `limit` bytes
pub async fn collect_body(body: Incoming, limit: usize) -> Result<Bytes, FrameworkError> {
    Limited::new(body, limit)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| {
            if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                FrameworkError::PayloadTooLarge { limit }
            } else {
                FrameworkError::internal(format!("Failed to read request body: {}", e))
            }
        })
}

/// Parse bytes as JSON into the target type
pub fn parse_json<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    serde_json::from_slice(bytes)
        .map_err(|e| FrameworkError::bad_request(format!("Failed to parse JSON body: {}", e)))
}
