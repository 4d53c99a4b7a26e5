use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::AppConfig, error::ConfigError};

use super::{ModelProvider, ModelRequest};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        // Accept both `gemini-pro` and the resource form `models/gemini-pro`.
        let model = match model.strip_prefix("models/") {
            Some(stripped) => stripped.to_owned(),
            None => model,
        };

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fails with [`ConfigError::MissingCredential`] when no API key is configured.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or(ConfigError::MissingCredential {
                name: "GOOGLE_GEMINI_KEY",
            })?;

        Self::new(
            api_key,
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            config.request_timeout,
        )
    }

    /// Lists the models that can serve `generateContent`, following pagination.
    pub async fn list_models(&self) -> anyhow::Result<Vec<GeminiModelInfo>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut builder = self
                .client
                .get(format!("{}/v1beta/models", self.base_url))
                .header(API_KEY_HEADER, &self.api_key);
            if let Some(token) = &page_token {
                builder = builder.query(&[("pageToken", token)]);
            }

            let response = builder.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("gemini model listing failed with {status}: {body}");
            }
            let page = response.json::<ListModelsResponse>().await?;

            models.extend(
                page.models
                    .into_iter()
                    .filter(|model| {
                        model
                            .supported_generation_methods
                            .iter()
                            .any(|method| method == "generateContent")
                    })
                    .map(model_info),
            );

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiModelInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub input_token_limit: Option<u64>,
}

fn model_info(model: RemoteModel) -> GeminiModelInfo {
    let name = model
        .name
        .strip_prefix("models/")
        .map(str::to_owned)
        .unwrap_or(model.name);

    GeminiModelInfo {
        name,
        display_name: model.display_name,
        description: model.description,
        input_token_limit: model.input_token_limit,
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    description: String,
    input_token_limit: Option<u64>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String> {
        let payload = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system_prompt,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.user_prompt,
                }],
            }],
        };

        debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("gemini returned {status}: {body}");
        }

        let response = response.json::<GenerateContentResponse>().await?;
        extract_text(response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn extract_text(response: GenerateContentResponse) -> anyhow::Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "no candidates".to_owned());
        anyhow::bail!("model returned no candidates: {reason}");
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        anyhow::bail!("model returned an empty candidate");
    }

    Ok(text)
}
