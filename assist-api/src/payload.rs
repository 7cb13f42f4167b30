use http::StatusCode;
use axum_core::response::{Response, IntoResponse};
use serde::Serialize;

use crate::response::{serialize_json, error_json};

/// successful json response. the value is the whole body, there is no
/// envelope around it
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T> Payload<T> {
    pub fn new(payload: T) -> Self {
        Payload(payload)
    }
}

impl<T> IntoResponse for Payload<T>
where
    T: Serialize
{
    fn into_response(self) -> Response {
        serialize_json(StatusCode::OK, &self.0).unwrap_or_else(|err| {
            tracing::error!("failed to serialize payload: {err}");

            error_json()
        })
    }
}
