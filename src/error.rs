//! Error types for the pixiv-sync application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Service errors
    #[error("{message} <{code}>")]
    Authentication { code: String, message: String },

    #[error("Request limit seems to be exceeded. Try again later. ({message} <{code}>)")]
    QuotaExceeded { code: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("API error: {0}")]
    Api(String),

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Interrupted")]
    Interrupted,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether a single request that failed with this error is worth repeating.
    ///
    /// Only transport-level failures qualify. Auth and quota errors never do.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            _ => false,
        }
    }

    /// Whether this error should end the whole job rather than a single record.
    pub fn is_fatal_for_job(&self) -> bool {
        matches!(
            self,
            Error::Authentication { .. } | Error::QuotaExceeded { .. } | Error::Interrupted
        )
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_JOBS_FAILED: i32 = 6;
    pub const AUTH_ERROR: i32 = 7;
}
