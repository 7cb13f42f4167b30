use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::http::header::InvalidHeaderValue;
use axum::response::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SetCookie {
    pub key: String,
    pub value: String,

    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<Duration>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl SetCookie {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        SetCookie {
            key: key.into(),
            value: value.into(),
            expires: None,
            max_age: None,
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn set_domain<D>(&mut self, domain: D)
    where
        D: Into<String>
    {
        self.domain = Some(domain.into());
    }

    pub fn with_path<P>(mut self, path: P) -> Self
    where
        P: Into<String>
    {
        self.path = Some(path.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn to_header_string(&self) -> String {
        let mut rtn = format!("{}={}", self.key, self.value);

        if let Some(expires) = &self.expires {
            let _ = write!(rtn, "; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT"));
        }

        if let Some(max_age) = &self.max_age {
            let _ = write!(rtn, "; Max-Age={}", max_age.as_secs());
        }

        if let Some(domain) = &self.domain {
            let _ = write!(rtn, "; Domain={}", domain);
        }

        if let Some(path) = &self.path {
            let _ = write!(rtn, "; Path={}", path);
        }

        if self.secure {
            rtn.push_str("; Secure");
        }

        if self.http_only {
            rtn.push_str("; HttpOnly");
        }

        if let Some(same_site) = &self.same_site {
            let _ = write!(rtn, "; SameSite={}", same_site.as_str());
        }

        rtn
    }

    pub fn into_header_value(self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_header_string())
    }
}

/// adds a "set-cookie" header without replacing ones already present
pub fn append_cookie(response: &mut Response, cookie: SetCookie) -> Result<(), InvalidHeaderValue> {
    response.headers_mut().append(header::SET_COOKIE, cookie.into_header_value()?);

    Ok(())
}

/// finds the first cookie with the given name across all "cookie" headers
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(value_str) = value.to_str() else {
            continue;
        };

        for pair in value_str.split(';') {
            let Some((key, value)) = pair.trim().split_once('=') else {
                continue;
            };

            if key == name {
                return Some(value);
            }
        }
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn full_header() {
        let expires = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let cookie = SetCookie::new("session_id", "abc")
            .with_expires(expires)
            .with_path("/")
            .with_http_only(true)
            .with_secure(true)
            .with_same_site(SameSite::Strict);

        assert_eq!(
            cookie.to_header_string(),
            "session_id=abc; Expires=Tue, 02 Jan 2024 03:04:05 GMT; Path=/; Secure; HttpOnly; SameSite=Strict"
        );
    }

    #[test]
    fn expired_header() {
        let cookie = SetCookie::new("flash", "")
            .with_max_age(Duration::from_secs(0))
            .with_path("/");

        assert_eq!(cookie.to_header_string(), "flash=; Max-Age=0; Path=/");
    }

    #[test]
    fn finds_among_many() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; flash=xyz"));
        headers.append(header::COOKIE, HeaderValue::from_static("session_id=tok=="));

        assert_eq!(find_cookie(&headers, "flash"), Some("xyz"));
        assert_eq!(find_cookie(&headers, "session_id"), Some("tok=="));
        assert_eq!(find_cookie(&headers, "missing"), None);
    }
}
