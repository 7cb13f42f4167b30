use std::ops::Deref;
use std::pin::Pin;
use std::future::Future;

use axum::http::header::HeaderMap;
use axum::http::request::Parts;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use deadpool_postgres::{Pool, GenericClient};

use crate::net::{cookie, html, error};
use crate::net::flash::Flash;
use crate::sec::state;
use crate::template;
use crate::user;

use super::session::{self, Session, SessionToken};

pub struct Initiator {
    pub user: user::User,
    pub session: Session,
}

impl Initiator {
    pub fn user(&self) -> &user::User {
        &self.user
    }

    pub fn token(&self) -> &SessionToken {
        &self.session.token
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("session was not found")]
    SessionNotFound,

    #[error("session has expired")]
    SessionExpired(Session),

    #[error("session is unverified")]
    SessionUnverified(Session),

    #[error("user was not found")]
    UserNotFound(Session),

    #[error("no session cookie was found")]
    MechanismNotFound,

    #[error(transparent)]
    SessionDecode(#[from] session::DecodeError),

    #[error(transparent)]
    Database(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Pool(#[from] deadpool_postgres::PoolError),
}

impl LookupError {
    /// true when the failure is caused by the client not being logged in as
    /// opposed to a server side failure
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, LookupError::Database(_) | LookupError::Pool(_))
    }
}

impl From<LookupError> for error::Error {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::SessionNotFound => error::Error::api(error::AuthKind::SessionNotFound),
            LookupError::SessionExpired(_session) => error::Error::api(error::AuthKind::SessionExpired),
            LookupError::SessionUnverified(_session) => error::Error::api(error::AuthKind::SessionUnverified),
            LookupError::UserNotFound(_session) => error::Error::api(error::UserKind::NotFound),
            LookupError::MechanismNotFound => error::Error::api(error::AuthKind::Unauthenticated),
            LookupError::SessionDecode(_err) => error::Error::api(error::AuthKind::InvalidSession),
            LookupError::Database(e) => e.into(),
            LookupError::Pool(e) => e.into(),
        }
    }
}

/// decodes the session cookie from the given headers
pub fn find_token(auth: &state::Sec, headers: &HeaderMap) -> Result<SessionToken, LookupError> {
    let Some(found) = cookie::find_cookie(headers, session::SESSION_COOKIE) else {
        return Err(LookupError::MechanismNotFound);
    };

    Ok(session::decode_base64(auth, found.as_bytes())?)
}

/// checks the cache for a verified session, evicting it if it has expired
pub fn lookup_cache(auth: &state::Sec, token: &SessionToken) -> Option<Result<Initiator, LookupError>> {
    let cache = auth.session_info().cache();
    let (session, user) = cache.get(token)?;

    if session.is_expired(&chrono::Utc::now()) {
        cache.invalidate(token);

        return Some(Err(LookupError::SessionExpired(session)));
    }

    Some(Ok(Initiator { user, session }))
}

pub async fn lookup_token(
    auth: &state::Sec,
    conn: &impl GenericClient,
    token: &SessionToken,
) -> Result<Initiator, LookupError> {
    let Some(session) = Session::retrieve_token(conn, token).await? else {
        return Err(LookupError::SessionNotFound);
    };

    if session.is_expired(&chrono::Utc::now()) {
        return Err(LookupError::SessionExpired(session));
    }

    if !session.verified {
        return Err(LookupError::SessionUnverified(session));
    }

    let Some(user) = user::User::query_with_id(conn, &session.user_id).await? else {
        return Err(LookupError::UserNotFound(session));
    };

    auth.session_info().cache().insert(token.clone(), (session.clone(), user.clone()));

    Ok(Initiator { user, session })
}

pub async fn lookup_header_map(
    auth: &state::Sec,
    pool: &Pool,
    headers: &HeaderMap
) -> Result<Initiator, LookupError> {
    let token = find_token(auth, headers)?;

    if let Some(cached) = lookup_cache(auth, &token) {
        return cached;
    }

    let conn = pool.get().await?;

    lookup_token(auth, &conn, &token).await
}

/// the logged in user if there is one. lookup failures caused by the client
/// are treated as not logged in
pub async fn lookup_optional(
    auth: &state::Sec,
    pool: &Pool,
    headers: &HeaderMap
) -> error::Result<Option<Initiator>> {
    match lookup_header_map(auth, pool, headers).await {
        Ok(initiator) => Ok(Some(initiator)),
        Err(err) => if err.is_unauthenticated() {
            Ok(None)
        } else {
            Err(err.into())
        }
    }
}

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

/// rejection for session protected routes. browsers are sent to the login
/// page, everything else gets a json error
pub struct Rejection {
    html: bool,
    secure: bool,
    error: error::Error,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        if self.html {
            match template::redirect_with_flash("/login", Flash::info(LOGIN_REQUIRED), self.secure) {
                Ok(res) => res,
                Err(err) => err.into_response(),
            }
        } else {
            self.error.into_response()
        }
    }
}

impl<A, S> FromRequestParts<A> for Initiator
where
    A: Deref<Target = S> + Sync,
    S: AsRef<state::Sec> + AsRef<Pool> + Sync,
{
    type Rejection = Rejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 A,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait
    {
        Box::pin(async move {
            let state_deref = state.deref();

            let auth: &state::Sec = state_deref.as_ref();
            let pool: &Pool = state_deref.as_ref();

            match lookup_header_map(auth, pool, &parts.headers).await {
                Ok(initiator) => Ok(initiator),
                Err(err) => {
                    let html = err.is_unauthenticated() && matches!(
                        html::is_html_accept(&parts.headers),
                        Ok(Some(_))
                    );

                    Err(Rejection {
                        html,
                        secure: auth.session_info().secure(),
                        error: err.into()
                    })
                }
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::{header, HeaderValue, StatusCode};
    use crate::sec::state::test_sec;
    use crate::user::User;

    fn cached_pair(expires: chrono::DateTime<chrono::Utc>) -> (Session, User) {
        let session = Session {
            token: SessionToken::random().unwrap(),
            user_id: 7,
            issued_on: chrono::Utc::now(),
            expires,
            verified: true,
        };
        let user = User {
            id: 7,
            username: String::from("alice"),
            email: String::from("alice@example.com"),
            password: String::new(),
            otp_secret: None,
            otp_enrolled: true,
            consent: true,
        };

        (session, user)
    }

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("other=1; session_id={value}")).unwrap()
        );
        headers
    }

    #[test]
    fn missing_cookie() {
        let auth = test_sec();

        assert!(matches!(
            find_token(&auth, &HeaderMap::new()),
            Err(LookupError::MechanismNotFound)
        ));
    }

    #[test]
    fn cookie_token_decoded() {
        let auth = test_sec();
        let token = SessionToken::random().unwrap();
        let encoded = session::encode_base64(&token, session::create_hash(&auth, &token));

        assert_eq!(find_token(&auth, &cookie_headers(&encoded)).unwrap(), token);
    }

    #[test]
    fn cache_hit_and_expired_eviction() {
        let auth = test_sec();
        let (valid, user) = cached_pair(chrono::Utc::now() + chrono::Duration::days(1));
        let (expired, other) = cached_pair(chrono::Utc::now() - chrono::Duration::seconds(1));

        auth.session_info().cache().insert(valid.token.clone(), (valid.clone(), user));
        auth.session_info().cache().insert(expired.token.clone(), (expired.clone(), other));

        let found = lookup_cache(&auth, &valid.token).unwrap().unwrap();
        assert_eq!(found.user().username, "alice");

        assert!(matches!(
            lookup_cache(&auth, &expired.token),
            Some(Err(LookupError::SessionExpired(_)))
        ));
        assert!(lookup_cache(&auth, &expired.token).is_none());
    }

    #[test]
    fn rejection_by_client() {
        let html = Rejection {
            html: true,
            secure: false,
            error: LookupError::MechanismNotFound.into(),
        }.into_response();

        assert_eq!(html.status(), StatusCode::SEE_OTHER);
        assert_eq!(html.headers().get(header::LOCATION).unwrap(), "/login");

        let mut next = HeaderMap::new();
        next.insert(header::COOKIE, html.headers().get(header::SET_COOKIE).unwrap().clone());

        let flash = Flash::from_headers(&next);

        assert_eq!(flash.messages().len(), 1);
        assert_eq!(flash.messages()[0].message, LOGIN_REQUIRED);

        let json = Rejection {
            html: false,
            secure: false,
            error: LookupError::MechanismNotFound.into(),
        }.into_response();

        assert_eq!(json.status(), StatusCode::UNAUTHORIZED);
    }
}
