use axum::response::{Response, IntoResponse};

pub use assist_api::error::{
    ApiError,
    GeneralKind,
    AuthKind,
    UserKind,
    AssistantKind,
};

type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

/// used by `HandleErrorLayer` for errors produced by tower middleware
pub async fn handle_layer_error(error: tower::BoxError) -> Response {
    if error.is::<tower::timeout::error::Elapsed>() {
        Error::api(GeneralKind::Timeout).into_response()
    } else {
        Error::new()
            .source(error)
            .into_response()
    }
}

#[derive(Debug)]
pub struct Error {
    inner: ApiError,
    context: Option<String>,
    src: Option<BoxDynError>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new() -> Self {
        Error {
            inner: Default::default(),
            context: None,
            src: None,
        }
    }

    pub fn api<T>(value: T) -> Self
    where
        T: Into<ApiError>
    {
        Error {
            inner: value.into(),
            context: None,
            src: None
        }
    }

    pub fn context<C>(mut self, ctx: C) -> Self
    where
        C: Into<String>
    {
        self.context = Some(ctx.into());
        self
    }

    pub fn source<S>(mut self, src: S) -> Self
    where
        S: Into<BoxDynError>
    {
        self.src = Some(src.into());
        self
    }

    pub fn inner(&self) -> &ApiError {
        &self.inner
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)?;

        if let Some(cxt) = &self.context {
            write!(f, " ({cxt})")?;
        }

        if let Some(err) = &self.src {
            write!(f, ": {err}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.src.as_ref().map(|v| & **v as _)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Some(err) = &self.src {
            tracing::error!(
                kind = %self.inner().kind(),
                context = self.context.as_deref().unwrap_or(""),
                "request failed: {err:?}"
            );
        }

        self.inner.into_response()
    }
}

impl From<ApiError> for Error {
    fn from(api_err: ApiError) -> Self {
        Error::api(api_err)
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Backend(e) => Self::from(e),
            deadpool_postgres::PoolError::Timeout(_) => Error::api(GeneralKind::Timeout)
                .source(err),
            other => Error::new().source(other)
        }
    }
}

/// maps a source error onto an api error kind. without a kind the
/// response is an internal failure
macro_rules! from_source {
    ($($e:path),+ $(,)?) => {
        $(
            impl From<$e> for Error {
                fn from(err: $e) -> Self {
                    Error::new().source(err)
                }
            }
        )+
    };
    ($e:path => $k:expr $(, $cxt:literal)?) => {
        impl From<$e> for Error {
            fn from(err: $e) -> Self {
                Error::api($k)
                    $(.context($cxt))?
                    .source(err)
            }
        }
    };
}

from_source!(
    assist_lib::sec::chacha::CryptoError,
    assist_lib::otp::OtpError,
    std::io::Error,
    std::fmt::Error,
    axum::Error,
    axum::http::Error,
    handlebars::RenderError,
    tokio_postgres::Error,
    serde_json::Error,
    rand::Error,
    argon2::Error,
    qrcode::types::QrError,
);

from_source!(assist_lib::assistant::GenerateError => AssistantKind::GenerationFailed, "text generation failed");
impl From<assist_lib::assistant::ServiceError> for Error {
    fn from(err: assist_lib::assistant::ServiceError) -> Self {
        use assist_lib::assistant::ServiceError;

        match err {
            ServiceError::Unavailable(name) => Error::api(AssistantKind::ServiceUnavailable)
                .context(format!("{name} is not configured")),
            ServiceError::InvalidEndpoint(_) => Error::new().source(err),
            other => Error::api(AssistantKind::ServiceFailed)
                .context("remote service failed")
                .source(other),
        }
    }
}

from_source!(axum::http::header::ToStrError => GeneralKind::InvalidHeaderValue);
from_source!(axum::http::header::InvalidHeaderValue => GeneralKind::InvalidHeaderValue);
from_source!(mime::FromStrError => GeneralKind::InvalidMimeType);
from_source!(base64::DecodeError => GeneralKind::InvalidData);

assist_lib::context_trait!(Error);

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<BoxDynError>
{
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        self.map_err(|err| Error::new()
            .context(cxt)
            .source(err))
    }
}

impl<T> Context<T, ()> for std::option::Option<T> {
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        self.ok_or_else(|| Error::new().context(cxt))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assist_api::ApiErrorKind;
    use axum::http::StatusCode;

    #[test]
    fn generation_failure_is_bad_gateway() {
        let err = Error::from(assist_lib::assistant::GenerateError::Empty);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn service_failures() {
        use assist_lib::assistant::ServiceError;

        let unavailable = Error::from(ServiceError::Unavailable("translation"));

        assert_eq!(
            unavailable.inner().kind(),
            &ApiErrorKind::Assistant(AssistantKind::ServiceUnavailable)
        );
        assert_eq!(unavailable.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let failed = Error::from(ServiceError::Status(500));

        assert_eq!(failed.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn sources_are_internal() {
        let err = Error::from(std::io::Error::other("disk"));

        assert_eq!(err.inner().kind(), &ApiErrorKind::General(GeneralKind::InternalFailure));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn option_context() {
        let missing: Option<u8> = None;
        let err = missing.context("nothing here").unwrap_err();

        assert_eq!(err.to_string(), "InternalFailure (nothing here)");
    }
}
