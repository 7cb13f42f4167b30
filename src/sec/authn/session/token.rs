use rand::RngCore;
use tokio_postgres::{Error as PgError};
use deadpool_postgres::GenericClient;

use crate::net::error;

pub const SESSION_ID_BYTES: usize = 48;

#[derive(Debug, thiserror::Error)]
pub enum UniqueError {
    #[error(transparent)]
    Rand(#[from] rand::Error),

    #[error(transparent)]
    Pg(#[from] PgError),
}

impl From<UniqueError> for error::Error {
    fn from(err: UniqueError) -> error::Error {
        match err {
            UniqueError::Rand(e) => error::Error::from(e).context("failed generating session token"),
            UniqueError::Pg(e) => error::Error::from(e).context("failed checking session token"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SessionToken([u8; SESSION_ID_BYTES]);

impl SessionToken {
    pub fn random() -> Result<Self, rand::Error> {
        let mut rtn = [0; SESSION_ID_BYTES];

        rand::thread_rng().try_fill_bytes(&mut rtn)?;

        Ok(SessionToken(rtn))
    }

    /// creates a random token that is not already present in the database,
    /// giving up after the given number of collisions
    pub async fn unique(conn: &impl GenericClient, attempts: usize) -> Result<Option<Self>, UniqueError> {
        for _ in 0..attempts {
            let token = Self::random()?;

            let taken: bool = conn.query_one(
                "select exists(select 1 from auth_session where token = $1)",
                &[&token.as_slice()]
            ).await?.get(0);

            if !taken {
                return Ok(Some(token));
            }

            tracing::debug!("session token collision");
        }

        Ok(None)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<[u8; SESSION_ID_BYTES]> for SessionToken {
    fn from(bytes: [u8; SESSION_ID_BYTES]) -> Self {
        SessionToken(bytes)
    }
}

impl AsRef<[u8]> for SessionToken {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("session token must be exactly {SESSION_ID_BYTES} bytes")]
pub struct InvalidLength;

impl TryFrom<&[u8]> for SessionToken {
    type Error = InvalidLength;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        <[u8; SESSION_ID_BYTES]>::try_from(slice)
            .map(SessionToken)
            .map_err(|_| InvalidLength)
    }
}

impl TryFrom<Vec<u8>> for SessionToken {
    type Error = InvalidLength;

    fn try_from(vec: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(vec.as_slice())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn length_checked() {
        assert!(SessionToken::try_from(vec![0u8; SESSION_ID_BYTES]).is_ok());
        assert!(SessionToken::try_from(vec![0u8; SESSION_ID_BYTES - 1]).is_err());
        assert!(SessionToken::try_from(vec![0u8; SESSION_ID_BYTES + 1]).is_err());
    }

    #[test]
    fn random_tokens_differ() {
        let a = SessionToken::random().unwrap();
        let b = SessionToken::random().unwrap();

        assert_ne!(a, b);
    }
}
