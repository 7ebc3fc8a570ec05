use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OAuth client not configured. Run `wl-sorter init` to configure.")]
    ClientConfigMissing,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("YouTube API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No valid YouTube video IDs found in the text.")]
    NoVideoIds,

    #[error("Unknown playlist: {0}")]
    UnknownPlaylist(String),

    #[error("Invalid page size {0} (allowed: 10, 20, 50, 100)")]
    InvalidPageSize(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
