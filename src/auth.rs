//! Google OAuth2 authorization-code flow.
//!
//! The user opens the link from [`OAuthFlow::authorization_url`], consents,
//! and is redirected to the configured redirect URI with a `code` query
//! parameter. They paste that URL (or just the code) back into the prompt and
//! [`OAuthFlow::exchange_code`] trades it for a bearer token.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::OAuthClientConfig;
use crate::error::{Error, Result};

const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Read-only access to the user's YouTube account
pub const YOUTUBE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";

/// Bearer credential obtained from the token endpoint
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// One sign-in attempt, bound to a random `state` value
pub struct OAuthFlow {
    config: OAuthClientConfig,
    state: String,
    client: Client,
}

impl OAuthFlow {
    pub fn new(config: OAuthClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            config,
            state: uuid::Uuid::new_v4().simple().to_string(),
            client,
        })
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Link the user opens to grant access
    pub fn authorization_url(&self) -> Result<Url> {
        let url = Url::parse_with_params(
            AUTH_URI,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", YOUTUBE_READONLY_SCOPE),
                ("state", self.state.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )?;
        Ok(url)
    }

    /// Pull the authorization code out of whatever the user pasted
    ///
    /// Accepts the full redirect URL (whose `state` must match this flow) or
    /// a bare code.
    pub fn code_from_input(&self, input: &str) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Auth("no authorization code given".to_string()));
        }

        let Ok(url) = Url::parse(input) else {
            return Ok(input.to_string());
        };

        let mut code = None;
        let mut state = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => return Err(Error::Auth(format!("consent was not granted ({})", value))),
                _ => {}
            }
        }

        if let Some(state) = state {
            if state != self.state {
                return Err(Error::Auth(
                    "state mismatch; the redirect belongs to another sign-in attempt".to_string(),
                ));
            }
        }

        code.filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Auth("redirect URL has no `code` parameter".to_string()))
    }

    /// Exchange an authorization code for credentials
    pub async fn exchange_code(&self, code: &str) -> Result<Credentials> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!(token_uri = TOKEN_URI, "exchanging authorization code");
        let response = self.client.post(TOKEN_URI).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Auth(token_error_message(status.as_u16(), &text)));
        }

        let token: TokenResponse = response.json().await?;
        info!("signed in");
        Ok(Credentials {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
        })
    }
}

fn token_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(err) => match err.error_description {
            Some(description) => format!("{}: {}", err.error, description),
            None => err.error,
        },
        Err(_) => format!("token endpoint returned {}", status),
    }
}
