use assist_lib::sec::{chacha, PASSWORDS_KEY_INFO, SESSIONS_KEY_INFO};

use crate::error;
use crate::config::{self, Kdf};

use super::authn::session::SessionCache;

pub struct SessionInfo {
    key: [u8; blake3::KEY_LEN],
    cache: SessionCache,
    domain: Option<String>,
    secure: bool,
}

impl std::fmt::Debug for SessionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionInfo")
            .field("cache", &self.cache.entry_count())
            .field("domain", &self.domain)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionInfo {
    fn from_kdf(kdf: &Kdf, session: &config::Session) -> error::Result<Self> {
        tracing::debug!("creating SessionInfo state");

        let mut key = [0u8; blake3::KEY_LEN];

        if let Err(_err) = kdf.expand(SESSIONS_KEY_INFO, &mut key) {
            return Err(error::Error::new()
                .kind("KDFExpandFailed")
                .message("failed to expand session key"));
        }

        let cache = SessionCache::builder()
            .name("session_cache")
            .max_capacity(1_000)
            .time_to_idle(std::time::Duration::from_secs(60 * 10))
            .build();

        Ok(SessionInfo {
            key,
            cache,
            domain: session.domain.clone(),
            secure: session.secure,
        })
    }

    pub fn key(&self) -> &[u8; blake3::KEY_LEN] {
        &self.key
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn domain(&self) -> Option<&String> {
        self.domain.as_ref()
    }

    pub fn secure(&self) -> bool {
        self.secure
    }
}

pub struct Sec {
    session_info: SessionInfo,
    pepper: chacha::Key,
}

impl std::fmt::Debug for Sec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sec")
            .field("session_info", &self.session_info)
            .finish_non_exhaustive()
    }
}

impl Sec {
    pub fn from_config(config: &config::Config) -> error::Result<Sec> {
        Self::from_kdf(&config.kdf, &config.settings.sec.session)
    }

    pub fn from_kdf(kdf: &Kdf, session: &config::Session) -> error::Result<Sec> {
        tracing::debug!("creating Sec state");

        let mut pepper = chacha::empty_key();

        if let Err(_err) = kdf.expand(PASSWORDS_KEY_INFO, &mut pepper) {
            return Err(error::Error::new()
                .kind("KDFExpandFailed")
                .message("failed to expand passwords key"));
        }

        Ok(Sec {
            session_info: SessionInfo::from_kdf(kdf, session)?,
            pepper,
        })
    }

    pub fn session_info(&self) -> &SessionInfo {
        &self.session_info
    }

    pub fn pepper(&self) -> &chacha::Key {
        &self.pepper
    }
}

#[cfg(test)]
pub fn test_sec() -> Sec {
    let kdf = Kdf::new(None, b"test_master_key");

    let session = config::Session {
        secure: false,
        domain: None,
    };

    Sec::from_kdf(&kdf, &session).unwrap()
}
