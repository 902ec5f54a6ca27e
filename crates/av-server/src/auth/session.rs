//! Session token store with sliding expiration

use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::RngCore;

use av_core::config::AuthConfig;
use av_core::error::AuthError;

use super::pin::PinVerifier;

/// Length of a session token in bytes (before hex encoding)
pub const TOKEN_BYTES: usize = 32;

/// Generate a new random session token
///
/// Returns a 64-character hex string (256 random bits)
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Concurrent map of session tokens to their last activity
///
/// Each check-and-refresh runs under the token's shard lock, so a token can
/// never be refreshed once it has aged past the lifetime, even when two
/// requests race on it.
pub struct SessionStore {
    sessions: DashMap<String, Instant>,
    lifetime: Duration,
    pin: PinVerifier,
    required: bool,
}

impl SessionStore {
    /// Create a store from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            lifetime: config.session_lifetime,
            pin: PinVerifier::new(config.pin.as_deref()),
            required: config.is_required(),
        }
    }

    /// Whether requests must present a valid session
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Session lifetime used for expiry and the cookie max-age
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Exchange the PIN for a new session token
    ///
    /// With authentication disabled any PIN is accepted so clients can follow
    /// the same flow either way.
    pub fn login(&self, pin: &str) -> Result<String, AuthError> {
        if self.required && !self.pin.verify(pin) {
            tracing::warn!("Rejected login with wrong PIN");
            return Err(AuthError::Unauthorized);
        }

        let token = generate_token();
        self.sessions.insert(token.clone(), Instant::now());
        tracing::info!("New session created ({} active)", self.sessions.len());
        Ok(token)
    }

    /// Check a token, refreshing its activity timestamp when valid
    pub fn authorize(&self, token: Option<&str>) -> bool {
        self.authorize_at(token, Instant::now())
    }

    /// [`Self::authorize`] against an explicit clock reading
    pub fn authorize_at(&self, token: Option<&str>, now: Instant) -> bool {
        if !self.required {
            return true;
        }
        let Some(token) = token else {
            return false;
        };

        match self.sessions.get_mut(token) {
            None => return false,
            Some(mut last_seen) => {
                if now.saturating_duration_since(*last_seen) <= self.lifetime {
                    *last_seen = now;
                    return true;
                }
            }
        }

        // Expired: purge unless another request already did
        let lifetime = self.lifetime;
        self.sessions
            .remove_if(token, |_, seen| now.saturating_duration_since(*seen) > lifetime);
        tracing::debug!("Session expired");
        false
    }

    /// Read-only validity check that neither refreshes nor purges
    pub fn is_valid(&self, token: Option<&str>) -> bool {
        if !self.required {
            return true;
        }
        token
            .and_then(|t| self.sessions.get(t))
            .map(|seen| seen.elapsed() <= self.lifetime)
            .unwrap_or(false)
    }

    /// Drop a token. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            tracing::info!("Session logged out");
        }
    }

    /// Remove every expired token, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// [`Self::purge_expired`] against an explicit clock reading
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        let lifetime = self.lifetime;
        self.sessions
            .retain(|_, seen| now.saturating_duration_since(*seen) <= lifetime);
        before.saturating_sub(self.sessions.len())
    }

    /// Number of live tokens
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if there are no tokens
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
