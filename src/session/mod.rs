use std::fmt;

use anyhow::Context;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;

pub(crate) mod extractors;

pub use extractors::{MaybeSession, Session};

/// Opaque per-browser identity owning a set of meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cookie that hands a freshly issued session to the browser.
pub(crate) fn session_cookie(cfg: &SessionConfig, id: SessionId) -> anyhow::Result<Cookie<'static>> {
    let max_age = cfg
        .max_age_days
        .checked_mul(24 * 60 * 60)
        .map(time::Duration::seconds)
        .context("session max age out of range")?;
    Ok(Cookie::build((cfg.cookie_name.clone(), id.to_string()))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.secure)
        .build())
}

/// Session id carried by the named cookie, if it is a UUID.
pub(crate) fn read_session(jar: &CookieJar, name: &str) -> Option<SessionId> {
    let cookie = jar.get(name)?;
    match Uuid::parse_str(cookie.value_trimmed()) {
        Ok(id) => Some(SessionId(id)),
        Err(_) => {
            tracing::warn!("malformed session cookie");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar(values: &[&str]) -> CookieJar {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(header::COOKIE, HeaderValue::from_str(v).unwrap());
        }
        CookieJar::from_headers(&map)
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let id = SessionId::generate();
        let jar = jar(&[format!("theme=dark; sessionId={id}; lang=en").as_str()]);
        assert_eq!(read_session(&jar, "sessionId"), Some(id));
    }

    #[test]
    fn searches_every_cookie_header() {
        let id = SessionId::generate();
        let jar = jar(&["theme=dark", format!("sessionId=\"{id}\"").as_str()]);
        assert_eq!(read_session(&jar, "sessionId"), Some(id));
    }

    #[test]
    fn missing_or_malformed_session_is_none() {
        let id = SessionId::generate();
        assert_eq!(read_session(&jar(&[format!("sessionIdentifier={id}").as_str()]), "sessionId"), None);
        assert_eq!(read_session(&jar(&["sessionId=abc"]), "sessionId"), None);
        assert_eq!(read_session(&CookieJar::new(), "sessionId"), None);
    }

    #[test]
    fn session_cookie_carries_max_age_and_flags() {
        let id = SessionId::generate();
        let cookie = session_cookie(&SessionConfig::default(), id).unwrap();
        assert_eq!(cookie.name(), "sessionId");
        assert_eq!(cookie.value(), id.to_string());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.secure(), Some(true));

        let secure = SessionConfig {
            secure: true,
            ..SessionConfig::default()
        };
        let cookie = session_cookie(&secure, id).unwrap();
        assert_eq!(cookie.secure(), Some(true));
        assert!(cookie.to_string().contains("Secure"));
    }

    #[test]
    fn oversized_max_age_is_an_error() {
        let cfg = SessionConfig {
            max_age_days: 200_000_000_000_000,
            ..SessionConfig::default()
        };
        let err = session_cookie(&cfg, SessionId::generate()).unwrap_err();
        assert!(err.to_string().contains("max age"));
    }
}
