pub mod request_id;

pub use request_id::RequestIdLayer;

pub mod trace {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, Response};
    use tracing::Span;
    use tower_http::classify::ServerErrorsFailureClass;

    use super::request_id::RequestId;

    pub fn make_span_with(request: &Request<Body>) -> Span {
        let id = RequestId::from_request(request)
            .map(|id| id.get())
            .unwrap_or_default();

        tracing::info_span!(
            "request",
            id,
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            status = tracing::field::Empty
        )
    }

    pub fn on_request(_request: &Request<Body>, _span: &Span) {
        tracing::debug!("started");
    }

    pub fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
        span.record("status", response.status().as_u16());

        tracing::info!(latency_ms = latency.as_millis() as u64, "finished")
    }

    pub fn on_failure(error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
        tracing::error!(latency_ms = latency.as_millis() as u64, "failed: {error}")
    }
}
