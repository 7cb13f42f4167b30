use chrono::{DateTime, Utc};
use base64::{Engine, engine::general_purpose::URL_SAFE};
use tokio_postgres::{Error as PgError};
use deadpool_postgres::GenericClient;

use crate::sec::state;
use crate::net::error::Error as NetError;
use crate::net::cookie::{SameSite, SetCookie};
use crate::user::{User, UserId};

pub mod token;

pub use token::SessionToken;

pub const SESSION_COOKIE: &str = "session_id";

/// time a session may wait on the second factor
pub const PENDING_MINUTES: i64 = 10;
pub const VERIFIED_DAYS: i64 = 7;

/// verified sessions with the user they belong to
pub type SessionCache = moka::sync::Cache<SessionToken, (Session, User)>;

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("ran out of token attempts")]
    TokenAttempts,

    #[error("date time value overflowed")]
    UtcOverflow,

    #[error(transparent)]
    Pg(#[from] PgError),

    #[error(transparent)]
    Rand(#[from] rand::Error),
}

impl From<token::UniqueError> for BuilderError {
    fn from(err: token::UniqueError) -> Self {
        match err {
            token::UniqueError::Rand(err) => BuilderError::Rand(err),
            token::UniqueError::Pg(err) => BuilderError::Pg(err)
        }
    }
}

impl From<BuilderError> for NetError {
    fn from(err: BuilderError) -> NetError {
        match err {
            BuilderError::Pg(err) => err.into(),
            BuilderError::Rand(err) => err.into(),
            err => NetError::new().source(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub issued_on: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    /// false while the session is waiting on the second factor
    pub verified: bool,
}

impl Session {
    /// creates the pending session issued after a correct password
    pub async fn create_pending(conn: &impl GenericClient, user_id: UserId) -> Result<Self, BuilderError> {
        let issued_on = Utc::now();

        let Some(token) = SessionToken::unique(conn, 10).await? else {
            return Err(BuilderError::TokenAttempts);
        };

        let Some(expires) = issued_on.checked_add_signed(chrono::Duration::minutes(PENDING_MINUTES)) else {
            return Err(BuilderError::UtcOverflow);
        };

        let verified = false;

        let _ = conn.execute(
            "\
            insert into auth_session (token, user_id, issued_on, expires, verified) values \
            ($1, $2, $3, $4, $5)",
            &[&token.as_slice(), &user_id, &issued_on, &expires, &verified]
        ).await?;

        Ok(Session {
            token,
            user_id,
            issued_on,
            expires,
            verified,
        })
    }

    pub fn is_expired(&self, now: &DateTime<Utc>) -> bool {
        self.expires <= *now
    }

    pub async fn retrieve_token(
        conn: &impl GenericClient,
        token: &SessionToken
    ) -> Result<Option<Session>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select auth_session.user_id, \
                   auth_session.issued_on, \
                   auth_session.expires, \
                   auth_session.verified \
            from auth_session \
            where auth_session.token = $1",
            &[&token.as_slice()]
        ).await? {
            Ok(Some(Session {
                token: token.clone(),
                user_id: row.get(0),
                issued_on: row.get(1),
                expires: row.get(2),
                verified: row.get(3),
            }))
        } else {
            Ok(None)
        }
    }

    /// clears the pending marker and extends the session to its full length.
    /// false if the session is gone, expired or was already verified
    pub async fn verify(&mut self, conn: &impl GenericClient) -> Result<bool, BuilderError> {
        let now = Utc::now();

        let Some(expires) = now.checked_add_signed(chrono::Duration::days(VERIFIED_DAYS)) else {
            return Err(BuilderError::UtcOverflow);
        };

        let updated = conn.execute(
            "\
            update auth_session \
            set issued_on = $2, \
                expires = $3, \
                verified = true \
            where token = $1 and \
                  verified = false and \
                  expires > $2",
            &[&self.token.as_slice(), &now, &expires]
        ).await?;

        if updated != 1 {
            return Ok(false);
        }

        self.issued_on = now;
        self.expires = expires;
        self.verified = true;

        Ok(true)
    }

    pub async fn delete(&self, conn: &impl GenericClient) -> Result<(), PgError> {
        let _ = conn.execute(
            "delete from auth_session where token = $1",
            &[&self.token.as_slice()]
        ).await?;

        Ok(())
    }

    /// removes every expired session, returning the tokens that were removed
    pub async fn delete_expired(
        conn: &impl GenericClient,
        now: &DateTime<Utc>
    ) -> Result<Vec<SessionToken>, PgError> {
        let rows = conn.query(
            "delete from auth_session where expires <= $1 returning token",
            &[now]
        ).await?;

        let mut rtn = Vec::with_capacity(rows.len());

        for row in rows {
            let bytes: Vec<u8> = row.get(0);

            match SessionToken::try_from(bytes) {
                Ok(token) => rtn.push(token),
                Err(_) => tracing::warn!("deleted session with invalid token length"),
            }
        }

        Ok(rtn)
    }
}

pub type Hash = blake3::Hash;

pub fn create_hash<T>(auth: &state::Sec, token: T) -> Hash
where
    T: AsRef<[u8]>
{
    blake3::keyed_hash(auth.session_info().key(), token.as_ref())
}

pub fn encode_base64<T>(token: T, hash: Hash) -> String
where
    T: AsRef<[u8]>
{
    let token_ref = token.as_ref();

    let slice = hash.as_bytes();

    let mut joined = Vec::with_capacity(token_ref.len() + slice.len());
    joined.extend_from_slice(token_ref);
    joined.extend_from_slice(slice);

    URL_SAFE.encode(joined)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("session id is not valid base64")]
    InvalidString,

    #[error("session id has an invalid length")]
    InvalidLength,

    #[error("session id hash does not match")]
    InvalidHash,
}

pub fn decode_base64<S>(
    auth: &state::Sec,
    session_id: S
) -> Result<SessionToken, DecodeError>
where
    S: AsRef<[u8]>
{
    let Ok(bytes) = URL_SAFE.decode(session_id) else {
        return Err(DecodeError::InvalidString);
    };

    if bytes.len() != token::SESSION_ID_BYTES + blake3::OUT_LEN {
        return Err(DecodeError::InvalidLength);
    };

    let (token_bytes, hash_bytes) = bytes.split_at(token::SESSION_ID_BYTES);

    let token = SessionToken::try_from(token_bytes)
        .map_err(|_| DecodeError::InvalidLength)?;
    let hash: [u8; blake3::OUT_LEN] = hash_bytes.try_into()
        .map_err(|_| DecodeError::InvalidLength)?;

    // blake3::Hash equality is constant time
    if blake3::Hash::from(hash) != create_hash(auth, &token) {
        Err(DecodeError::InvalidHash)
    } else {
        Ok(token)
    }
}

pub fn create_session_cookie(auth: &state::Sec, session: &Session) -> SetCookie {
    let hash = create_hash(auth, &session.token);
    let encoded_token = encode_base64(&session.token, hash);

    let mut cookie = SetCookie::new(SESSION_COOKIE, encoded_token)
        .with_expires(session.expires)
        .with_path("/")
        .with_http_only(true)
        .with_secure(auth.session_info().secure())
        .with_same_site(SameSite::Strict);

    if let Some(domain) = auth.session_info().domain() {
        cookie.set_domain(domain);
    }

    cookie
}

pub fn expire_session_cookie(auth: &state::Sec) -> SetCookie {
    let mut cookie = SetCookie::new(SESSION_COOKIE, "")
        .with_max_age(std::time::Duration::new(0, 0))
        .with_path("/")
        .with_http_only(true)
        .with_secure(auth.session_info().secure())
        .with_same_site(SameSite::Strict);

    if let Some(domain) = auth.session_info().domain() {
        cookie.set_domain(domain);
    }

    cookie
}
