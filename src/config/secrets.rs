// src/config/secrets.rs
use std::env;

use crate::config::DigestConfig;
use crate::error::ConfigError;
use crate::ingest::types::Backend;

pub const ENV_SEARCH_API_KEY: &str = "SEARCH_API_KEY";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_RECEIVER_EMAIL: &str = "RECEIVER_EMAIL";

#[derive(Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: String,
}

/// Credentials resolved from the environment. Never read from the config file.
#[derive(Clone)]
pub struct Secrets {
    pub synthesis_api_key: String,
    pub search_api_key: Option<String>,
    /// `None` in dry-run mode.
    pub smtp: Option<SmtpCredentials>,
    pub recipient: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only lengths; never print the values.
        f.debug_struct("Secrets")
            .field("synthesis_key_len", &self.synthesis_api_key.len())
            .field("search_key_set", &self.search_api_key.is_some())
            .field("smtp_set", &self.smtp.is_some())
            .field("recipient", &self.recipient)
            .finish()
    }
}

fn var(name: &str, missing: &mut Vec<String>) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => {
            missing.push(name.to_string());
            None
        }
    }
}

impl Secrets {
    /// Read what `cfg` needs. Every missing variable is reported at once.
    pub fn from_env(cfg: &DigestConfig, dry_run: bool) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let synthesis_api_key = var(cfg.synthesis.api_key_var(), &mut missing);
        let search_api_key = if cfg.uses_backend(Backend::SearchApi) {
            var(ENV_SEARCH_API_KEY, &mut missing)
        } else {
            None
        };

        let (smtp, recipient) = if dry_run {
            let recipient = env::var(ENV_RECEIVER_EMAIL)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "dry-run@localhost".to_string());
            (None, Some(recipient))
        } else {
            let user = var(ENV_SMTP_USER, &mut missing);
            let password = var(ENV_SMTP_PASSWORD, &mut missing);
            let recipient = var(ENV_RECEIVER_EMAIL, &mut missing);
            let smtp = match (user, password) {
                (Some(user), Some(password)) => Some(SmtpCredentials { user, password }),
                _ => None,
            };
            (smtp, recipient)
        };

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        Ok(Self {
            synthesis_api_key: synthesis_api_key.unwrap_or_default(),
            search_api_key,
            smtp,
            recipient: recipient.unwrap_or_default(),
        })
    }
}

/// Load `.env` from the first location that has one:
/// current directory, then `~/.config/tech-digest/.env`.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("tech-digest").join(".env");
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}
