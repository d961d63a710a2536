//! Access-token persistence.
//!
//! The token is read from storage on every request and never cached, so a
//! token saved by another process (or cleared after a 401) takes effect on
//! the next call.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub trait TokenStore {
    /// The current token, or `None` when missing or expired.
    fn access_token(&self) -> Option<String>;

    /// Forget the stored token.
    fn clear(&self);
}

impl<S: TokenStore + ?Sized> TokenStore for &S {
    fn access_token(&self) -> Option<String> {
        (**self).access_token()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// On-disk token record. `expires_at` is milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredToken {
    pub access_token: String,
    pub expires_at: u64,
}

impl StoredToken {
    pub fn expiring_in(access_token: &str, seconds: u64) -> Self {
        Self {
            access_token: access_token.to_string(),
            expires_at: now_millis().saturating_add(seconds.saturating_mul(1000)),
        }
    }

    pub fn is_expired_at(&self, now_millis: u64) -> bool {
        now_millis >= self.expires_at
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Token kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<StoredToken> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable token file");
                None
            }
        }
    }

    pub fn save(&self, token: &StoredToken) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(token).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, json)
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        let token = self.load()?;
        if token.is_expired_at(now_millis()) {
            tracing::debug!("stored token expired");
            return None;
        }
        Some(token.access_token)
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove token file");
            }
        }
    }
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
    pub fn new(token: &str) -> Self {
        Self(Some(token.to_string()))
    }
}

impl TokenStore for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }

    fn clear(&self) {}
}
