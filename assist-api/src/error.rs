use http::StatusCode;
use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr};

/// declares a group of error kinds along with the status each one responds
/// with and its place in [`ApiErrorKind`]
macro_rules! kind_group {
    (
        $(#[$meta:meta])*
        $name:ident as $group:ident {
            $($kind:ident => $status:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq,
            StrumAsRefStr,
            Serialize, Deserialize
        )]
        pub enum $name {
            $($kind,)+
        }

        impl $name {
            pub fn status(&self) -> StatusCode {
                match self {
                    $($name::$kind => StatusCode::$status,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for ApiErrorKind {
            fn from(v: $name) -> Self {
                ApiErrorKind::$group(v)
            }
        }
    };
}

kind_group! {
    GeneralKind as General {
        InternalFailure => INTERNAL_SERVER_ERROR,
        Timeout => REQUEST_TIMEOUT,
        NotFound => NOT_FOUND,
        ValidationFailed => BAD_REQUEST,
        InvalidData => BAD_REQUEST,
        MissingData => BAD_REQUEST,
        InvalidUri => BAD_REQUEST,
        InvalidHeaderValue => BAD_REQUEST,
        InvalidMimeType => BAD_REQUEST,
        InvalidMethod => METHOD_NOT_ALLOWED,
        InvalidRequest => BAD_REQUEST,
    }
}

kind_group! {
    /// login and session failures
    AuthKind as Auth {
        Unauthenticated => UNAUTHORIZED,
        AlreadyAuthenticated => BAD_REQUEST,
        InvalidCredentials => FORBIDDEN,
        InvalidTotp => FORBIDDEN,
        InvalidSession => UNAUTHORIZED,
        SessionExpired => UNAUTHORIZED,
        SessionNotFound => UNAUTHORIZED,
        SessionUnverified => UNAUTHORIZED,
    }
}

kind_group! {
    UserKind as User {
        NotFound => NOT_FOUND,
        UsernameExists => CONFLICT,
        EmailExists => CONFLICT,
    }
}

kind_group! {
    /// the text generation backend or one of the optional remote services
    /// failed
    AssistantKind as Assistant {
        GenerationFailed => BAD_GATEWAY,
        ServiceUnavailable => SERVICE_UNAVAILABLE,
        ServiceFailed => BAD_GATEWAY,
    }
}

/// serializes as the name of the inner kind, e.g. `"SessionNotFound"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    General(GeneralKind),
    Auth(AuthKind),
    User(UserKind),
    Assistant(AssistantKind),
}

impl ApiErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorKind::General(v) => v.status(),
            ApiErrorKind::Auth(v) => v.status(),
            ApiErrorKind::User(v) => v.status(),
            ApiErrorKind::Assistant(v) => v.status(),
        }
    }

    fn name(&self) -> &str {
        match self {
            ApiErrorKind::General(v) => v.as_ref(),
            ApiErrorKind::Auth(v) => v.as_ref(),
            ApiErrorKind::User(v) => v.as_ref(),
            ApiErrorKind::Assistant(v) => v.as_ref(),
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ApiErrorKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer
    {
        serializer.serialize_str(self.name())
    }
}

impl From<&ApiErrorKind> for StatusCode {
    fn from(kind: &ApiErrorKind) -> Self {
        kind.status()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Detail {
    Keys(Vec<String>),
}

impl Detail {
    pub fn with_key(key: impl Into<String>) -> Self {
        Detail::Keys(vec![key.into()])
    }

    pub fn mult_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Detail::Keys(keys.into_iter().map(Into::into).collect())
    }

    pub fn keys(&self) -> &[String] {
        match self {
            Detail::Keys(list) => list.as_slice()
        }
    }
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detail::Keys(list) => {
                let mut iter = list.iter();

                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;

                    for key in iter {
                        write!(f, ",{}", key)?;
                    }
                }
            },
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    kind: ApiErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Detail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<String>,
}

impl ApiError {
    pub fn new() -> Self {
        ApiError {
            kind: ApiErrorKind::General(GeneralKind::InternalFailure),
            detail: None,
            msg: None
        }
    }

    pub fn with_kind<K>(mut self, kind: K) -> Self
    where
        K: Into<ApiErrorKind>
    {
        self.kind = kind.into();
        self
    }

    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_message<M>(mut self, msg: M) -> Self
    where
        M: Into<String>
    {
        self.msg = Some(msg.into());
        self
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

impl std::default::Default for ApiError {
    fn default() -> Self {
        ApiError::new()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }

        if let Some(msg) = &self.msg {
            write!(f, ": {}", msg)?;
        }

        Ok(())
    }
}

impl<K> From<K> for ApiError
where
    K: Into<ApiErrorKind>
{
    fn from(kind: K) -> Self {
        ApiError {
            kind: kind.into(),
            detail: None,
            msg: None
        }
    }
}

impl<K,M> From<(K, M)> for ApiError
where
    K: Into<ApiErrorKind>,
    M: Into<String>,
{
    fn from((kind, msg): (K, M)) -> Self {
        ApiError {
            kind: kind.into(),
            detail: None,
            msg: Some(msg.into())
        }
    }
}

impl<K> From<(K, Detail)> for ApiError
where
    K: Into<ApiErrorKind>
{
    fn from((kind, detail): (K, Detail)) -> Self {
        ApiError {
            kind: kind.into(),
            detail: Some(detail),
            msg: None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kinds_map_to_status() {
        let cases: [(ApiErrorKind, StatusCode); 5] = [
            (GeneralKind::ValidationFailed.into(), StatusCode::BAD_REQUEST),
            (AuthKind::Unauthenticated.into(), StatusCode::UNAUTHORIZED),
            (AuthKind::InvalidTotp.into(), StatusCode::FORBIDDEN),
            (UserKind::UsernameExists.into(), StatusCode::CONFLICT),
            (AssistantKind::GenerationFailed.into(), StatusCode::BAD_GATEWAY),
        ];

        for (kind, status) in cases {
            assert_eq!(StatusCode::from(&kind), status, "{kind}");
        }
    }

    #[test]
    fn serializes_flat_kind() {
        let err = ApiError::from(AuthKind::SessionNotFound);
        let json = serde_json::to_string(&err).unwrap();

        assert_eq!(json, r#"{"kind":"SessionNotFound"}"#);
    }

    #[test]
    fn display_with_detail() {
        let err = ApiError::from((
            GeneralKind::ValidationFailed,
            Detail::mult_keys(["username", "email"])
        ));

        assert_eq!(err.to_string(), "ValidationFailed: username,email");
    }
}
