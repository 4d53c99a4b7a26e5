use async_trait::async_trait;

use super::{ModelProvider, ModelRequest};

/// Offline provider that echoes the prompt. Selected with `MODEL_PROVIDER=mock`.
#[derive(Debug, Default)]
pub struct MockModelProvider;

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String> {
        Ok(format!("Mock reply to: {}", request.user_prompt))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
