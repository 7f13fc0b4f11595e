use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{AdminConfig, MAX_TOKEN_TTL_MINUTES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("incorrect username or password")]
    InvalidCredentials,
    #[error("missing or unknown bearer token")]
    InvalidToken,
    #[error("session expired")]
    Expired,
    #[error("session store unavailable")]
    Unavailable,
    #[error("session expiry out of range")]
    ExpiryOutOfRange,
}

/// Opaque bearer sessions for the single configured administrator.
#[derive(Debug)]
pub struct AdminAuth {
    username: String,
    password: String,
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl AdminAuth {
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            ttl: Duration::minutes(config.token_ttl_minutes.clamp(1, MAX_TOKEN_TTL_MINUTES)),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AdminToken, AuthError> {
        self.login_at(username, password, Utc::now())
    }

    pub fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminToken, AuthError> {
        if username != self.username || password != self.password {
            warn!(username, "admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = Uuid::new_v4().simple().to_string();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;

        let mut sessions = self.lock()?;
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            access_token.clone(),
            Session {
                username: username.to_string(),
                expires_at,
            },
        );
        info!(username, %expires_at, "admin session issued");

        Ok(AdminToken {
            access_token,
            token_type: "bearer",
            expires_at,
        })
    }

    pub fn authorize(&self, token: &str) -> Result<String, AuthError> {
        self.authorize_at(token, Utc::now())
    }

    pub fn authorize_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let mut sessions = self.lock()?;
        let session = sessions.get(token).ok_or(AuthError::InvalidToken)?;
        if session.expires_at <= now {
            sessions.remove(token);
            return Err(AuthError::Expired);
        }
        Ok(session.username.clone())
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value.
    pub fn bearer_token(header: &str) -> Option<&str> {
        let (scheme, token) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Session>>, AuthError> {
        self.sessions.lock().map_err(|_| AuthError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AdminAuth {
        AdminAuth::new(&AdminConfig {
            username: "admin".to_string(),
            password: "s3cret".to_string(),
            token_ttl_minutes: 30,
        })
    }

    #[test]
    fn login_rejects_wrong_password() {
        assert_eq!(
            auth().login("admin", "guess"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn issued_token_authorizes_until_expiry() {
        let auth = auth();
        let now = Utc::now();
        let token = auth.login_at("admin", "s3cret", now).expect("login");
        assert_eq!(token.token_type, "bearer");

        assert_eq!(
            auth.authorize_at(&token.access_token, now + Duration::minutes(29)),
            Ok("admin".to_string())
        );
        assert_eq!(
            auth.authorize_at(&token.access_token, now + Duration::minutes(31)),
            Err(AuthError::Expired)
        );
        assert_eq!(
            auth.authorize_at(&token.access_token, now),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn oversized_ttl_is_capped() {
        let auth = AdminAuth::new(&AdminConfig {
            username: "admin".to_string(),
            password: "s3cret".to_string(),
            token_ttl_minutes: 1_000_000_000_000,
        });
        let now = Utc::now();
        let token = auth.login_at("admin", "s3cret", now).expect("login");
        assert_eq!(
            token.expires_at,
            now + Duration::minutes(MAX_TOKEN_TTL_MINUTES)
        );
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        assert_eq!(
            auth().login_at("admin", "s3cret", DateTime::<Utc>::MAX_UTC),
            Err(AuthError::ExpiryOutOfRange)
        );
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(AdminAuth::bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(AdminAuth::bearer_token("bearer  abc123 "), Some("abc123"));
        assert_eq!(AdminAuth::bearer_token("Basic abc123"), None);
        assert_eq!(AdminAuth::bearer_token("Bearer "), None);
    }
}
