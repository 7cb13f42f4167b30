use std::task::{Context, Poll};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tower::{Layer, Service};
use axum::http::Request;

/// sequential id attached to each request as an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(u64);

impl RequestId {
    pub fn from_request<B>(req: &Request<B>) -> Option<Self> {
        req.extensions().get().copied()
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
    next: Arc<AtomicU64>,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let id = RequestId(self.next.fetch_add(1, Ordering::Relaxed));

        request.extensions_mut().insert(id);

        self.inner.call(request)
    }
}

/// tags every request with an increasing id, starting at 1. services
/// created from the same layer share the counter
#[derive(Debug, Clone)]
pub struct RequestIdLayer {
    next: Arc<AtomicU64>,
}

impl RequestIdLayer {
    pub fn new() -> Self {
        RequestIdLayer {
            next: Arc::new(AtomicU64::new(1))
        }
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService {
            inner,
            next: Arc::clone(&self.next),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::Infallible;

    use tower::ServiceExt;

    #[tokio::test]
    async fn ids_increase() {
        let layer = RequestIdLayer::new();
        let svc = tower::service_fn(|req: Request<()>| async move {
            Ok::<u64, Infallible>(RequestId::from_request(&req).unwrap().get())
        });

        let first = layer.layer(svc.clone()).oneshot(Request::new(())).await.unwrap();
        let second = layer.layer(svc).oneshot(Request::new(())).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }
}
