//! Client configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! subdomain = "your-subdomain"
//! api_key_env = "RECURLY_API_KEY"
//!
//! [http]
//! timeout_secs = 30
//!
//! [subscription_updates]
//! carry_forward = ["net_terms", "subscription_add_ons"]
//! ```

use std::{fmt, path::Path};

use serde::Deserialize;
use url::Url;

use crate::{
    error::{RecurlyError, Result},
    models::UpdatePolicy,
    transport::{HttpConfig, http::validate_base_url},
};

/// Environment variable read when no inline key is configured.
pub const DEFAULT_API_KEY_ENV: &str = "RECURLY_API_KEY";

/// Root client configuration.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Site subdomain; the API root is `https://{subdomain}.recurly.com/v2/`.
    #[serde(default)]
    pub subdomain: String,

    /// Full API root, overriding `subdomain`. Must be HTTPS.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Private API key. Prefer `api_key_env` outside of tests.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// HTTP connection settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Fields preserved across subscription updates.
    #[serde(default)]
    pub subscription_updates: UpdatePolicy,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("subdomain", &self.subdomain)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("http", &self.http)
            .field("subscription_updates", &self.subscription_updates)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            subdomain: String::new(),
            base_url: None,
            api_key: None,
            api_key_env: default_api_key_env(),
            http: HttpConfig::default(),
            subscription_updates: UpdatePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Config`] on syntax errors, unknown keys or invalid
    /// values.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| RecurlyError::Config(e.message().to_owned()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Io`] if the file cannot be read, otherwise the same
    /// errors as [`Self::from_toml`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Validates the configuration.
    ///
    /// Checks that:
    /// - either `subdomain` or `base_url` is set, and the subdomain is a DNS label
    /// - `base_url` is an absolute HTTPS URL
    /// - `api_key_env` is a valid environment variable name
    /// - the `[http]` section is within bounds
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        match &self.base_url {
            Some(base_url) => {
                let url = Url::parse(base_url)
                    .map_err(|e| RecurlyError::Config(format!("invalid base_url: {e}")))?;
                validate_base_url(&url)?;
            }
            None => validate_subdomain(&self.subdomain)?,
        }
        if self.api_key.as_deref().is_some_and(str::is_empty) {
            return Err(RecurlyError::Config("api_key cannot be empty".to_owned()));
        }
        validate_env_var_name(&self.api_key_env)?;
        self.http.validate()
    }

    /// API root every request path is resolved against.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Config`] if neither `base_url` nor `subdomain` is set.
    pub fn base_url(&self) -> Result<String> {
        if let Some(base_url) = &self.base_url {
            return Ok(base_url.clone());
        }
        validate_subdomain(&self.subdomain)?;
        Ok(format!("https://{}.recurly.com/v2/", self.subdomain))
    }

    /// Returns the inline API key, or reads it from `api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`RecurlyError::Config`] if no key is configured and the environment
    /// variable is unset or empty.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(RecurlyError::Config(format!(
                "no api_key configured and {} is not set",
                self.api_key_env
            ))),
        }
    }
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_owned()
}

fn validate_subdomain(subdomain: &str) -> Result<()> {
    if subdomain.is_empty() {
        return Err(RecurlyError::Config("either subdomain or base_url must be set".to_owned()));
    }
    let valid = subdomain.len() <= 63
        && !subdomain.starts_with('-')
        && !subdomain.ends_with('-')
        && subdomain.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(RecurlyError::Config(format!("invalid subdomain: {subdomain:?}")));
    }
    Ok(())
}

fn validate_env_var_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(RecurlyError::Config("api_key_env cannot be empty".to_owned()));
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(RecurlyError::Config(format!(
            "api_key_env must start with a letter or underscore: {name}"
        )));
    }
    if let Some(ch) = chars.find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(RecurlyError::Config(format!(
            "api_key_env contains invalid character '{ch}': {name}"
        )));
    }
    Ok(())
}
