use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::domain::prompt::GenerationRequest;
use crate::error::{AppError, AppResult};
use crate::services::{CredentialProvider, TextGeneratorService};

const MAX_COMPLETION_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

pub struct AzureOpenAiClient {
    http: Client,
    endpoint: Option<String>,
    deployment: String,
    api_version: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl AzureOpenAiClient {
    pub fn new(
        endpoint: Option<String>,
        deployment: String,
        api_version: String,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            deployment,
            api_version,
            credentials,
        }
    }

    fn completions_url(&self) -> AppResult<String> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            AppError::Configuration("backend endpoint not configured".to_string())
        })?;
        Ok(format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        ))
    }
}

#[async_trait]
impl TextGeneratorService for AzureOpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        let url = self.completions_url()?;
        let token = self.credentials.bearer_token().await?;
        let body = ChatCompletionRequest::from_generation(request);

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::Backend(format!("failed to call backend: {err}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Authentication(format!(
                "backend rejected the credential ({status})"
            )));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Backend(format!(
                "backend responded with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::Backend(format!("failed to parse backend response: {err}"))
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Backend("backend returned no choices".to_string()))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    n: u8,
}

impl ChatCompletionRequest {
    fn from_generation(request: &GenerationRequest) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "system",
                    content: request.context.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user.clone(),
                },
            ],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: TEMPERATURE,
            n: 1,
        }
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoCredentials;

    #[async_trait]
    impl CredentialProvider for NoCredentials {
        async fn bearer_token(&self) -> AppResult<String> {
            Ok("unused".to_string())
        }
    }

    fn client(endpoint: Option<&str>) -> AzureOpenAiClient {
        AzureOpenAiClient::new(
            endpoint.map(str::to_string),
            "gpt-4-turbo".to_string(),
            "2024-06-01".to_string(),
            Arc::new(NoCredentials),
        )
    }

    #[test]
    fn builds_the_deployment_url() {
        let url = client(Some("https://example.openai.azure.com/"))
            .completions_url()
            .unwrap();
        assert_eq!(
            url,
            "https://example.openai.azure.com/openai/deployments/gpt-4-turbo/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn missing_endpoint_is_a_configuration_error() {
        assert!(matches!(
            client(None).completions_url(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn request_body_carries_the_prompt_triple() {
        let request = GenerationRequest::summarize_chunk("chunk", "style");
        let body = ChatCompletionRequest::from_generation(&request);
        assert_eq!(body.messages.len(), 3);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].content, "style");
        assert_eq!(body.messages[2].role, "user");
        assert_eq!(body.n, 1);
    }
}
