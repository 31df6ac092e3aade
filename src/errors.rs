use core::fmt;

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Network(reqwest::Error),
    Api { status: u16, message: String },
    FailedRequest(String),
    Json(serde_json::Error),
    NotFound(String),
    Validation(String),
    Unauthorized(String),
    InvalidToken(String),
    Regex(regex::Error),
    Url(url::ParseError),
}

impl AppError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        AppError::Api {
            status,
            message: message.into(),
        }
    }

    /// True when the request never produced an HTTP status.
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

// Errors produced by `error_for_status()` carry the status code and belong
// to the Api variant; everything else never reached the server.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::api(status.as_u16(), err.to_string()),
            None => AppError::Network(err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err)
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Regex(err)
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Url(err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => {
                write!(f, "I/O error while accessing a file or resource: {}", e)
            }
            AppError::Network(e) => {
                write!(f, "Connection error, check your internet: {}", e)
            }
            AppError::Api { status, message } => {
                write!(f, "Server responded with {}: {}", status, message)
            }
            AppError::FailedRequest(msg) => {
                write!(f, "Request failed: {}", msg)
            }
            AppError::Json(e) => {
                write!(f, "Malformed JSON: {}", e)
            }
            AppError::NotFound(item) => {
                write!(f, "{} Not found", item)
            }
            AppError::Validation(msg) => {
                write!(f, "Validation failed: {}", msg)
            }
            AppError::Unauthorized(msg) => {
                write!(f, "Unauthorized: {}", msg)
            }
            AppError::InvalidToken(msg) => {
                write!(f, "Invalid session token: {}", msg)
            }
            AppError::Regex(e) => {
                write!(f, "Invalid pattern: {}", e)
            }
            AppError::Url(e) => {
                write!(f, "Invalid URL: {}", e)
            }
        }
    }
}

impl std::error::Error for AppError {}
