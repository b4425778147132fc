use thiserror::Error;

use crate::core::validation::{KeyMismatch, RequestDiff};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    Parse(String),

    #[error("XML serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(#[from] KeyMismatch),

    #[error("request mismatch: {0}")]
    RequestMismatch(#[from] RequestDiff),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("{request} needs at least one <{element}>")]
    EmptyRequest { request: &'static str, element: &'static str },

    #[error("no session token, call authenticate() first")]
    NotAuthenticated,

    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<xmltree::ParseError> for Error {
    fn from(err: xmltree::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}

/// A value outside the enumeration accepted by a field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field} '{value}'. Choose between {}", .allowed.join(", "))]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}
