use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use async_trait::async_trait;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use ollama_rs::generation::parameters::FormatType;
use ollama_rs::Ollama;
use std::fmt;
use tracing::debug;

use super::{LLMAdapter, LLMRequest};
use crate::error::ProviderError;
use crate::TARGET_LLM_REQUEST;

#[derive(Clone)]
pub enum LLMClient {
    Ollama(Ollama),
    OpenAI(OpenAIClient<OpenAIConfig>),
}

impl fmt::Debug for LLMClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMClient::Ollama(_) => write!(f, "LLMClient::Ollama"),
            LLMClient::OpenAI(_) => write!(f, "LLMClient::OpenAI"),
        }
    }
}

/// A configured model endpoint. This is what the pipeline holds as its adapter.
#[derive(Clone, Debug)]
pub struct LLMParams {
    pub llm_client: LLMClient,
    pub model: String,
    pub temperature: f32,
}

impl LLMParams {
    pub fn ollama(host: impl Into<String>, port: u16, model: impl Into<String>) -> Self {
        Self {
            llm_client: LLMClient::Ollama(Ollama::new(host.into(), port)),
            model: model.into(),
            temperature: 0.0,
        }
    }

    /// OpenAI-compatible endpoint. The API key is read from `OPENAI_API_KEY`.
    pub fn openai(model: impl Into<String>) -> Self {
        Self {
            llm_client: LLMClient::OpenAI(OpenAIClient::new()),
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    async fn complete_ollama(
        &self,
        ollama: &Ollama,
        request: &LLMRequest,
    ) -> Result<String, ProviderError> {
        let mut generation = GenerationRequest::new(self.model.clone(), request.user.clone());
        generation.system = Some(request.system.clone().into());
        generation.format = Some(FormatType::Json);
        generation.options = Some(GenerationOptions::default().temperature(self.temperature));

        let response = ollama
            .generate(generation)
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        Ok(response.response)
    }

    async fn complete_openai(
        &self,
        client: &OpenAIClient<OpenAIConfig>,
        request: &LLMRequest,
    ) -> Result<String, ProviderError> {
        let to_provider_error = |e: async_openai::error::OpenAIError| ProviderError::Request(e.to_string());

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.clone())
                .build()
                .map_err(to_provider_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user.clone())
                .build()
                .map_err(to_provider_error)?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .temperature(self.temperature)
            .response_format(ResponseFormat::JsonObject)
            .messages(messages)
            .build()
            .map_err(to_provider_error)?;

        let response = client
            .chat()
            .create(chat_request)
            .await
            .map_err(to_provider_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)
    }
}

#[async_trait]
impl LLMAdapter for LLMParams {
    async fn complete(&self, request: &LLMRequest) -> Result<String, ProviderError> {
        debug!(target: TARGET_LLM_REQUEST, "{:?} model {}: {} request", self.llm_client, self.model, request.task);
        let response = match &self.llm_client {
            LLMClient::Ollama(ollama) => self.complete_ollama(ollama, request).await?,
            LLMClient::OpenAI(client) => self.complete_openai(client, request).await?,
        };
        debug!(target: TARGET_LLM_REQUEST, "LLM response received: {}", response);
        Ok(response)
    }
}
