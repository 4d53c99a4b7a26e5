use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::AppConfig,
    model::{CompletionClient, build_model_provider},
    moderation::{ContentFilter, Decision},
    types::{PROCESSING_ERROR_MESSAGE, TurnOutcome},
};

/// Runs single turns through input moderation, the model, and output redaction.
///
/// Holds no per-conversation state; one instance serves every caller.
pub struct ChatSession {
    client: CompletionClient,
    filter: Arc<ContentFilter>,
}

impl ChatSession {
    pub fn new(client: CompletionClient, filter: Arc<ContentFilter>) -> Self {
        Self { client, filter }
    }

    /// Fails when the configured provider cannot be built, e.g. a missing credential.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let provider = build_model_provider(config)?;
        Ok(Self::new(
            CompletionClient::new(provider, config.system_prompt.clone()),
            Arc::new(ContentFilter::new(config.blocked_keywords.clone())),
        ))
    }

    pub async fn handle_turn(&self, user_text: &str) -> TurnOutcome {
        if let Decision::Rejected(message) = self.filter.check_input(user_text) {
            info!(%message, "user input rejected by content filter");
            return TurnOutcome::Rejected(message);
        }

        let reply = match self.client.complete(user_text).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(?error, model = %self.client.model_name(), "completion request failed");
                return TurnOutcome::Failed(PROCESSING_ERROR_MESSAGE.to_owned());
            }
        };

        let redacted = self.filter.redact_output(&reply);
        if redacted != reply.as_str() {
            info!("model output redacted");
        }

        TurnOutcome::Replied(redacted.into_owned())
    }

    pub fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
