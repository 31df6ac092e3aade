use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::{
    AppError, AuthApi, Credentials, Registration, TokenProvider, create_file_parent,
};
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::Deserialize;

pub const DEFAULT_TOKEN_PATH: &str = "./.instance/token";

/// Bearer token of the logged in user, persisted across runs in a file.
pub struct Session {
    path: PathBuf,
    token: RefCell<Option<String>>,
}

#[derive(Deserialize)]
struct Claims {
    exp: i64,
}

impl Session {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let token = if fs::exists(&path)? {
            let data = fs::read_to_string(&path)?;
            let data = data.trim();
            (!data.is_empty()).then(|| data.to_string())
        } else {
            None
        };

        Ok(Self {
            path,
            token: RefCell::new(token),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Returns false on rejected credentials and on transport errors alike.
    pub fn login(&self, api: &dyn AuthApi, credentials: &Credentials) -> bool {
        let token = match api.authenticate(credentials) {
            Ok(token) => token,
            Err(e) => {
                error!("login failed: {}", e);
                return false;
            }
        };

        if let Err(e) = self.store_token(&token) {
            error!("could not persist session token: {}", e);
            return false;
        }

        info!("logged in as {}", credentials.email);
        true
    }

    pub fn register(&self, api: &dyn AuthApi, registration: &Registration) -> Result<(), AppError> {
        api.register(registration).inspect_err(|e| error!("registration failed: {}", e))
    }

    pub fn logout(&self) -> Result<(), AppError> {
        *self.token.borrow_mut() = None;

        if fs::exists(&self.path)? {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn store_token(&self, token: &str) -> Result<(), AppError> {
        create_file_parent(&self.path)?;
        fs::write(&self.path, token)?;
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    /// Expiry time read from the token's `exp` claim.
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        match self.token.borrow().as_deref() {
            Some(token) => token_expiry(token).map(Some),
            None => Ok(None),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Ok(Some(exp)) => exp < now,
            Ok(None) => false,
            Err(e) => {
                warn!("{}", e);
                true
            }
        }
    }

    /// Logs out when the stored token has expired or cannot be decoded.
    pub fn expire_if_stale(&self) -> Result<bool, AppError> {
        if self.is_authenticated() && self.is_expired(Utc::now()) {
            warn!("session token expired, logging out");
            self.logout()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn require_user(&self) -> Result<(), AppError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::Unauthorized(
                "Not logged in, run `login` first".to_string(),
            ))
        }
    }

    pub fn require_public(&self) -> Result<(), AppError> {
        if self.is_authenticated() {
            Err(AppError::Unauthorized(
                "Already logged in, run `logout` first".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl TokenProvider for Session {
    fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }
}

pub fn token_expiry(token: &str) -> Result<DateTime<Utc>, AppError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::InvalidToken("missing payload segment".to_string()))?;

    // Some issuers keep the padding even in url-safe form
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::InvalidToken(e.to_string()))?;

    let claims: Claims = serde_json::from_slice(&bytes)?;

    DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AppError::InvalidToken(format!("exp out of range: {}", claims.exp)))
}
