use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, warn};

use super::{Session, SessionError};
use crate::config::SessionConfig;

type HmacSha256 = Hmac<Sha256>;

const GENERATED_KEY_BYTES: usize = 64;
const EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// What the cookie carries between requests
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct SessionData {
    user_id: i64,
    /// Expiry as unix seconds
    exp: i64,
}

/// Reads and writes signed session cookies.
#[derive(Clone)]
pub struct SessionManager {
    key: Arc<[u8]>,
    cookie_name: String,
    max_age_secs: i64,
    secure: bool,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("key", &"[REDACTED]")
            .field("cookie_name", &self.cookie_name)
            .field("max_age_secs", &self.max_age_secs)
            .field("secure", &self.secure)
            .finish()
    }
}

impl SessionManager {
    /// Build from config. Without a configured secret a random key is
    /// generated, so sessions do not survive a restart.
    pub fn new(config: &SessionConfig) -> Self {
        let key: Arc<[u8]> = match &config.secret {
            Some(secret) => Arc::from(secret.expose().as_bytes()),
            None => {
                warn!("SESSION_SECRET not set, using a random key for this process");
                let mut key = vec![0u8; GENERATED_KEY_BYTES];
                OsRng.fill_bytes(&mut key);
                Arc::from(key)
            }
        };

        Self {
            key,
            cookie_name: config.cookie_name.clone(),
            max_age_secs: config.max_age_secs,
            secure: config.cookie_secure,
        }
    }

    /// Session for the request. Missing, tampered, malformed or expired
    /// cookies all produce an empty session.
    pub fn load(&self, headers: &HeaderMap) -> Session {
        let mut session = Session::default();

        if let Some(raw) = self.find_cookie(headers) {
            match self.decode(&raw, chrono::Utc::now().timestamp()) {
                Some(user_id) => session.authenticate(user_id),
                None => debug!("ignoring invalid or expired session cookie"),
            }
        }

        session
    }

    /// Cookie carrying `session`. An unauthenticated session expires the cookie.
    pub fn save(&self, session: &Session) -> Result<SessionCookie, SessionError> {
        let value = match session.user_id() {
            Some(user_id) => {
                let token = self.encode(user_id, chrono::Utc::now().timestamp())?;
                self.attributes(&token, self.max_age_secs, None)
            }
            None => self.attributes("", 0, Some(EPOCH)),
        };

        Ok(SessionCookie {
            value: HeaderValue::from_str(&value)?,
        })
    }

    fn attributes(&self, value: &str, max_age: i64, expires: Option<&str>) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name, value, max_age
        );
        if let Some(expires) = expires {
            cookie.push_str("; Expires=");
            cookie.push_str(expires);
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn find_cookie(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.to_string())
    }

    fn encode(&self, user_id: i64, now: i64) -> Result<String, SessionError> {
        let data = SessionData {
            user_id,
            exp: now + self.max_age_secs,
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&data)?);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    fn decode(&self, token: &str, now: i64) -> Option<i64> {
        let (payload, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        // Constant-time comparison
        self.mac(payload).ok()?.verify_slice(&signature).ok()?;

        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let data: SessionData = serde_json::from_slice(&bytes).ok()?;

        (data.exp > now).then_some(data.user_id)
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, SessionError> {
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| SessionError::InvalidKey)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}

/// `Set-Cookie` header produced by [`SessionManager::save`].
#[must_use]
#[derive(Debug, Clone)]
pub struct SessionCookie {
    value: HeaderValue,
}

impl SessionCookie {
    pub fn header_value(&self) -> &HeaderValue {
        &self.value
    }
}

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut().append(SET_COOKIE, self.value);
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secret;

    fn config(secret: &str) -> SessionConfig {
        SessionConfig {
            cookie_name: "session".to_string(),
            secret: Some(Secret::new(secret)),
            max_age_secs: 3600,
            cookie_secure: false,
        }
    }

    fn manager() -> SessionManager {
        SessionManager::new(&config("an-unguessable-test-secret-of-32-bytes"))
    }

    fn request_headers(cookie: &SessionCookie) -> HeaderMap {
        // Set-Cookie "name=value; attrs" becomes Cookie "name=value"
        let set_cookie = cookie.header_value().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    #[test]
    fn saved_session_loads_back() {
        let sessions = manager();
        let mut session = Session::default();
        session.authenticate(42);

        let cookie = sessions.save(&session).unwrap();
        let loaded = sessions.load(&request_headers(&cookie));

        assert_eq!(loaded.user_id(), Some(42));
    }

    #[test]
    fn cookie_attributes() {
        let mut session = Session::default();
        session.authenticate(1);
        let cookie = manager().save(&session).unwrap();
        let value = cookie.header_value().to_str().unwrap();

        assert!(value.starts_with("session="));
        assert!(value.contains("Path=/"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Max-Age=3600"));
        assert!(!value.contains("Secure"));

        let mut secure = config("an-unguessable-test-secret-of-32-bytes");
        secure.cookie_secure = true;
        let cookie = SessionManager::new(&secure).save(&session).unwrap();
        assert!(cookie.header_value().to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn cleared_session_expires_the_cookie() {
        let mut session = Session::default();
        session.authenticate(1);
        session.clear();

        let cookie = manager().save(&session).unwrap();
        let value = cookie.header_value().to_str().unwrap();

        assert!(value.starts_with("session=;"));
        assert!(value.contains("Max-Age=0"));
        assert!(value.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn missing_cookie_is_an_empty_session() {
        assert_eq!(manager().load(&HeaderMap::new()), Session::default());
    }

    #[test]
    fn finds_the_cookie_among_others() {
        let sessions = manager();
        let token = sessions.encode(5, chrono::Utc::now().timestamp()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; session={}; lang=es", token)).unwrap(),
        );

        assert_eq!(sessions.load(&headers).user_id(), Some(5));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let sessions = manager();
        let token = sessions.encode(5, 1_000).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_payload = URL_SAFE_NO_PAD.encode(br#"{"user_id":1,"exp":999999999999}"#);
        let forged = format!("{}.{}", forged_payload, signature);

        assert_eq!(sessions.decode(&token, 1_000 - 1), Some(5));
        assert_eq!(sessions.decode(&forged, 1_000), None);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let sessions = manager();
        assert_eq!(sessions.decode("", 0), None);
        assert_eq!(sessions.decode("no-dot-here", 0), None);
        assert_eq!(sessions.decode("abc.not-hex", 0), None);
        assert_eq!(sessions.decode("!!!.00", 0), None);
    }

    #[test]
    fn expired_sessions_are_rejected() {
        let sessions = manager();
        let token = sessions.encode(5, 1_000).unwrap();

        assert_eq!(sessions.decode(&token, 1_000 + 3599), Some(5));
        assert_eq!(sessions.decode(&token, 1_000 + 3600), None);
    }

    #[test]
    fn other_secrets_cannot_read_the_cookie() {
        let token = manager().encode(5, 1_000).unwrap();
        let other = SessionManager::new(&config("a-completely-different-secret-value"));

        assert_eq!(other.decode(&token, 1_000), None);
    }

    #[test]
    fn generated_keys_differ_per_manager() {
        let mut cfg = config("unused");
        cfg.secret = None;

        let a = SessionManager::new(&cfg);
        let b = SessionManager::new(&cfg);
        let token = a.encode(5, 1_000).unwrap();

        assert_eq!(a.decode(&token, 1_000), Some(5));
        assert_eq!(b.decode(&token, 1_000), None);
    }

    #[test]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", manager());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("unguessable"));
    }
}
