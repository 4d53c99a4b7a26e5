use std::{env, net::SocketAddr, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Please provide informative and safe responses.";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Mock,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_bind: SocketAddr,
    pub model_provider: ProviderKind,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub system_prompt: String,
    pub blocked_keywords: Vec<String>,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT").unwrap_or_else(|| "5000".to_owned());
        let http_bind = lookup("HTTP_BIND").unwrap_or_else(|| format!("0.0.0.0:{port}"));
        let http_bind: SocketAddr = http_bind
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "HTTP_BIND",
                value: http_bind.clone(),
            })?;

        let model_provider = match lookup("MODEL_PROVIDER") {
            None => ProviderKind::Gemini,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "" | "gemini" => ProviderKind::Gemini,
                "mock" => ProviderKind::Mock,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "MODEL_PROVIDER",
                        value: raw,
                    });
                }
            },
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            None => Duration::from_secs(30),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    name: "REQUEST_TIMEOUT_SECS",
                    value: raw,
                })?,
        };

        Ok(Self {
            http_bind,
            model_provider,
            gemini_api_key: non_empty(lookup("GOOGLE_GEMINI_KEY")),
            gemini_model: non_empty(lookup("GEMINI_MODEL"))
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_owned()),
            gemini_base_url: non_empty(lookup("GEMINI_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_owned()),
            system_prompt: non_empty(lookup("SYSTEM_PROMPT"))
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_owned()),
            blocked_keywords: lookup("BLOCKED_KEYWORDS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            request_timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use crate::error::ConfigError;

    use super::{AppConfig, DEFAULT_GEMINI_MODEL, DEFAULT_SYSTEM_PROMPT, ProviderKind};

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn uses_defaults_when_unset() {
        let config = config_from(&[]).expect("defaults should parse");
        assert_eq!(config.http_bind.port(), 5000);
        assert_eq!(config.model_provider, ProviderKind::Gemini);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(config.blocked_keywords.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("GOOGLE_GEMINI_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("SYSTEM_PROMPT", "Be brief."),
            ("MODEL_PROVIDER", "Mock"),
            ("PORT", "9000"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .expect("overrides should parse");
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.system_prompt, "Be brief.");
        assert_eq!(config.model_provider, ProviderKind::Mock);
        assert_eq!(config.http_bind.to_string(), "0.0.0.0:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn http_bind_wins_over_port() {
        let config = config_from(&[("PORT", "9000"), ("HTTP_BIND", "127.0.0.1:7000")])
            .expect("bind should parse");
        assert_eq!(config.http_bind.to_string(), "127.0.0.1:7000");
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let config = config_from(&[("GOOGLE_GEMINI_KEY", "  ")]).expect("should parse");
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn splits_blocked_keywords() {
        let config = config_from(&[("BLOCKED_KEYWORDS", "spam, phish,,scam ")])
            .expect("keywords should parse");
        assert_eq!(config.blocked_keywords, vec!["spam", "phish", "scam"]);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            config_from(&[("HTTP_BIND", "not-an-address")]).err(),
            Some(ConfigError::InvalidValue {
                name: "HTTP_BIND",
                value: "not-an-address".to_owned(),
            })
        );
        assert!(matches!(
            config_from(&[("MODEL_PROVIDER", "openai")]),
            Err(ConfigError::InvalidValue { name: "MODEL_PROVIDER", .. })
        ));
        assert!(matches!(
            config_from(&[("REQUEST_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidValue { name: "REQUEST_TIMEOUT_SECS", .. })
        ));
    }
}
