//! Credential loading for pr-triage
//!
//! The GitHub token is read from the `GITHUB_TOKEN` environment variable at
//! startup. There is no secrets file: a missing token is a configuration
//! error raised before any request is made.

use std::fmt;

use tracing::debug;

use crate::{Error, Result};

/// Environment variable holding the GitHub token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Credentials for a run
#[derive(Clone)]
pub struct Secrets {
    github_token: String,
}

impl Secrets {
    /// Load the token from the environment
    pub fn from_env() -> Result<Self> {
        Self::from_value(std::env::var(TOKEN_ENV).ok())
    }

    /// Build secrets from a raw token value, trimming whitespace
    pub fn from_value(token: Option<String>) -> Result<Self> {
        let token = token.map(|t| t.trim().to_string()).unwrap_or_default();
        if token.is_empty() {
            return Err(Error::MissingEnv(format!(
                "{} is required. Create a token at https://github.com/settings/tokens",
                TOKEN_ENV
            )));
        }

        debug!("Using GitHub token from {} environment variable", TOKEN_ENV);
        Ok(Self {
            github_token: token,
        })
    }

    /// Get the GitHub token
    pub fn github_token(&self) -> &str {
        &self.github_token
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("github_token", &"<redacted>")
            .finish()
    }
}
