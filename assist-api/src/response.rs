use http::{StatusCode, HeaderValue};
use axum_core::body::Body;
use axum_core::response::{Response, IntoResponse};
use bytes::{Bytes, BytesMut, BufMut};
use serde::Serialize;

fn json_response(status: StatusCode, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json")
    );

    response
}

pub fn serialize_json(
    status: StatusCode,
    data: &impl Serialize
) -> Result<Response, serde_json::Error> {
    let mut writer = BytesMut::with_capacity(128).writer();

    serde_json::to_writer(&mut writer, data)?;

    Ok(json_response(status, writer.into_inner().freeze()))
}

/// fallback for when an error body itself fails to serialize
pub fn error_json() -> Response {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        Bytes::from_static(br#"{"kind":"InternalFailure"}"#)
    )
}

impl IntoResponse for crate::ApiError {
    fn into_response(self) -> Response {
        serialize_json(self.kind().status(), &self).unwrap_or_else(|err| {
            tracing::error!("failed to serialize api error: {err}");

            error_json()
        })
    }
}
