use crate::{
    config::{AppConfig, ProviderKind},
    moderation::ContentFilter,
    session::ChatSession,
    types::TurnOutcome,
};

const PLACEHOLDER_KEY: &str = "your_gemini_api_key_here";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

pub fn check_credential(config: &AppConfig) -> CheckResult {
    const NAME: &str = "Environment configuration";

    if config.model_provider == ProviderKind::Mock {
        return CheckResult::pass(NAME, "MODEL_PROVIDER=mock; no credential required");
    }

    match config.gemini_api_key.as_deref() {
        None => CheckResult::fail(NAME, "GOOGLE_GEMINI_KEY is not set"),
        Some(PLACEHOLDER_KEY) => {
            CheckResult::fail(NAME, "GOOGLE_GEMINI_KEY is still set to the placeholder value")
        }
        Some(_) => CheckResult::pass(
            NAME,
            format!("GOOGLE_GEMINI_KEY is set; model {}", config.gemini_model),
        ),
    }
}

pub fn check_filter(filter: &ContentFilter) -> CheckResult {
    const NAME: &str = "Content filter";

    if !filter.scan("Hello, how are you?").is_empty() {
        return CheckResult::fail(NAME, "false positive: safe content flagged");
    }
    if !filter.scan("How to hack?").contains(&"hack") {
        return CheckResult::fail(NAME, "false negative: unsafe content not detected");
    }

    CheckResult::pass(NAME, format!("{} keywords loaded", filter.keyword_count()))
}

pub async fn check_backend(session: &ChatSession) -> CheckResult {
    const NAME: &str = "API connection";

    match session.handle_turn("Say 'Hello' if you can hear me").await {
        TurnOutcome::Replied(reply) => {
            let sample = reply.chars().take(50).collect::<String>();
            CheckResult::pass(NAME, format!("sample response: {sample}"))
        }
        TurnOutcome::Rejected(message) => CheckResult::fail(NAME, message),
        TurnOutcome::Failed(_) => CheckResult::fail(
            NAME,
            "backend request failed (invalid key, network issue, or rate limit)",
        ),
    }
}

/// Runs every setup check in order. Never short-circuits.
pub async fn run_checks(config: &AppConfig) -> Vec<CheckResult> {
    let mut results = vec![check_credential(config)];
    results.push(check_filter(&ContentFilter::new(config.blocked_keywords.clone())));

    match ChatSession::from_config(config) {
        Ok(session) => results.push(check_backend(&session).await),
        Err(error) => results.push(CheckResult::fail(
            "API connection",
            format!("client could not be created: {error}"),
        )),
    }

    results
}
