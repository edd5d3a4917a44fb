use anyhow::anyhow;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use santa_types::Participant;
use santa_types::api::Claims;

pub const SESSION_COOKIE: &str = "santa_session";

/// Secret and lifetime for signed session cookies.
#[derive(Clone)]
pub struct SessionConfig {
    secret: String,
    ttl_days: i64,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_days,
        }
    }

    pub fn create_token(&self, participant: &Participant) -> anyhow::Result<String> {
        let exp = chrono::Duration::try_days(self.ttl_days)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .and_then(|at| usize::try_from(at.timestamp()).ok())
            .ok_or_else(|| anyhow!("session lifetime of {} days is out of range", self.ttl_days))?;
        let claims = Claims {
            sub: participant.clone(),
            exp,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// The participant named by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<Participant> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .ok()
        .map(|data| data.claims.sub)
    }

    /// Read and verify the session cookie, if any.
    pub fn participant(&self, jar: &CookieJar) -> Option<Participant> {
        jar.get(SESSION_COOKIE).and_then(|c| self.verify(c.value()))
    }
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
