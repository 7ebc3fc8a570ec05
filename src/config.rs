use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::listing::PageSize;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

pub const CLIENT_ID_VAR: &str = "WL_SORTER_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "WL_SORTER_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "WL_SORTER_REDIRECT_URI";
pub const PAGE_SIZE_VAR: &str = "WL_SORTER_PAGE_SIZE";

/// Redirect target registered for local use
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8501";

/// Get the base data directory (~/.wl-sorter/)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        std::env::var("WL_SORTER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".wl-sorter")
            })
    })
}

/// Get the .env file path
pub fn env_file_path() -> PathBuf {
    data_dir().join(".env")
}

/// Load environment variables from the data directory's .env file
pub fn load_env() {
    let env_path = env_file_path();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    } else {
        // Try current directory as fallback
        let _ = dotenvy::dotenv();
    }
}

/// Create the data directory if it doesn't exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(data_dir())?;
    Ok(())
}

/// OAuth client registration used for the authorization-code flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl OAuthClientConfig {
    /// Read the client registration from the environment
    pub fn from_env() -> Result<Self> {
        let client_id = non_empty_var(CLIENT_ID_VAR).ok_or(Error::ClientConfigMissing)?;
        let client_secret = non_empty_var(CLIENT_SECRET_VAR).ok_or(Error::ClientConfigMissing)?;
        let redirect_uri =
            non_empty_var(REDIRECT_URI_VAR).unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
        })
    }

    /// Render as .env file contents
    pub fn to_env_file(&self) -> String {
        format!(
            "{}={}\n{}={}\n{}={}\n",
            CLIENT_ID_VAR,
            self.client_id,
            CLIENT_SECRET_VAR,
            self.client_secret,
            REDIRECT_URI_VAR,
            self.redirect_uri
        )
    }
}

/// Page size preferred by the user, falling back to the smallest allowed value
pub fn default_page_size() -> PageSize {
    non_empty_var(PAGE_SIZE_VAR)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .and_then(|n| PageSize::try_from(n).ok())
        .unwrap_or_default()
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn env_file_contains_all_client_variables() {
        let config = OAuthClientConfig {
            client_id: "id.apps.googleusercontent.com".to_string(),
            client_secret: "s3cret".to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        };

        assert_eq!(
            config.to_env_file(),
            "WL_SORTER_CLIENT_ID=id.apps.googleusercontent.com\n\
             WL_SORTER_CLIENT_SECRET=s3cret\n\
             WL_SORTER_REDIRECT_URI=http://localhost:8501\n"
        );
    }
}
