pub mod remote;
pub mod session;

use crate::prelude::{AppError, Contact, NewContact};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Remote contact collection as seen by the store.
///
/// Implementations report a non-2xx response as `AppError::Api`. Any other
/// error is taken to mean the request never got an answer (`RemoteApi`
/// uses `AppError::Network`). The store relies on that split.
pub trait ContactApi {
    fn fetch_all(&self) -> Result<Vec<Contact>, AppError>;

    fn fetch_one(&self, id: &str) -> Result<Contact, AppError>;

    fn create(&self, contact: &NewContact) -> Result<Contact, AppError>;

    /// `Ok(None)` means the server accepted the update but sent back no
    /// JSON body.
    fn update(&self, contact: &Contact) -> Result<Option<Contact>, AppError>;

    fn toggle_favorite(&self, id: &str) -> Result<(), AppError>;

    fn delete(&self, id: &str) -> Result<(), AppError>;
}

pub trait AuthApi {
    /// Returns the bearer token issued for the credentials.
    fn authenticate(&self, credentials: &Credentials) -> Result<String, AppError>;

    fn register(&self, registration: &Registration) -> Result<(), AppError>;
}

pub trait TokenProvider {
    fn token(&self) -> Option<String>;
}

impl TokenProvider for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub fn create_file_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
