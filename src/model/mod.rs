mod gemini;
mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{AppConfig, ProviderKind};

pub use gemini::{GeminiModelInfo, GeminiProvider};
pub use mock::MockModelProvider;

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String>;

    fn model_name(&self) -> &str;
}

/// A model provider bound to the system instruction sent with every prompt.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn ModelProvider>,
    system_instruction: String,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn ModelProvider>, system_instruction: impl Into<String>) -> Self {
        Self {
            provider,
            system_instruction: system_instruction.into(),
        }
    }

    pub async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.provider
            .complete(ModelRequest {
                system_prompt: self.system_instruction.clone(),
                user_prompt: prompt.to_owned(),
            })
            .await
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }
}

pub fn build_model_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn ModelProvider>> {
    match config.model_provider {
        ProviderKind::Gemini => {
            let provider = GeminiProvider::from_config(config)?;
            info!(model = %provider.model_name(), "using Gemini model provider");
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => {
            warn!("MODEL_PROVIDER=mock; using mock model provider");
            Ok(Arc::new(MockModelProvider))
        }
    }
}
