//! one shot messages carried across a redirect in the "flash" cookie. the
//! cookie holds url safe base64 of a json list and is cleared once rendered

use std::time::Duration;

use axum::http::HeaderMap;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Serialize, Deserialize};

use crate::net::cookie::{self, SameSite, SetCookie};
use crate::net::error;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Success,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub category: Category,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flash(Vec<Message>);

impl Flash {
    pub fn new() -> Self {
        Flash(Vec::new())
    }

    pub fn with<M>(mut self, category: Category, message: M) -> Self
    where
        M: Into<String>
    {
        self.push(category, message);
        self
    }

    pub fn push<M>(&mut self, category: Category, message: M)
    where
        M: Into<String>
    {
        self.0.push(Message {
            category,
            message: message.into()
        });
    }

    pub fn success<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Flash::new().with(Category::Success, message)
    }

    pub fn danger<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Flash::new().with(Category::Danger, message)
    }

    pub fn info<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Flash::new().with(Category::Info, message)
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// adds the messages of another flash after the current ones
    pub fn extend(&mut self, other: Flash) {
        self.0.extend(other.0);
    }

    /// reads the incoming flash cookie. a malformed value is treated as empty
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(value) = cookie::find_cookie(headers, FLASH_COOKIE) else {
            return Flash::new();
        };

        Self::decode(value).unwrap_or_else(|| {
            tracing::debug!("discarding malformed flash cookie");

            Flash::new()
        })
    }

    fn decode(value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;

        serde_json::from_slice(&bytes).ok()
    }

    fn encode(&self) -> error::Result<String> {
        let json = serde_json::to_vec(self)?;

        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn into_cookie(self, secure: bool) -> error::Result<SetCookie> {
        Ok(SetCookie::new(FLASH_COOKIE, self.encode()?)
            .with_path("/")
            .with_http_only(true)
            .with_secure(secure)
            .with_same_site(SameSite::Lax))
    }
}

pub fn expire_cookie(secure: bool) -> SetCookie {
    SetCookie::new(FLASH_COOKIE, "")
        .with_max_age(Duration::from_secs(0))
        .with_path("/")
        .with_http_only(true)
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
}
