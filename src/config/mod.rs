use std::env;

use crate::errors::ClientError;

const DEFAULT_API_BASE: &str = "http://localhost:2423/api";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_token: None,
            timeout_secs: None,
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let timeout_secs = match env::var("CINEDEX_TIMEOUT_SECS") {
            Ok(raw) => Some(raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("CINEDEX_TIMEOUT_SECS is not a number: {raw}"))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            api_base: env::var("CINEDEX_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            api_token: env::var("CINEDEX_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            timeout_secs,
        })
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ClientConfig::new("http://example.test");
        assert_eq!(config.api_base, "http://example.test");
        assert!(config.api_token.is_none());
        assert!(config.timeout_secs.is_none());

        let config = config.with_api_token("app");
        assert_eq!(config.api_token.as_deref(), Some("app"));
    }

    // All env assertions live in one test so parallel tests never race on the
    // process environment.
    #[test]
    fn from_env_reads_and_validates() {
        env::remove_var("CINEDEX_API_BASE");
        env::set_var("CINEDEX_API_TOKEN", "  ");
        env::remove_var("CINEDEX_TIMEOUT_SECS");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.api_token.is_none());

        env::set_var("CINEDEX_API_BASE", "https://movies.test/api");
        env::set_var("CINEDEX_API_TOKEN", "secret");
        env::set_var("CINEDEX_TIMEOUT_SECS", "15");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_base, "https://movies.test/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, Some(15));

        env::set_var("CINEDEX_TIMEOUT_SECS", "soon");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ClientError::Config(_))
        ));

        env::remove_var("CINEDEX_API_BASE");
        env::remove_var("CINEDEX_API_TOKEN");
        env::remove_var("CINEDEX_TIMEOUT_SECS");
    }
}
