//! LLM client (`spec.md` §4.7, §9 "Polymorphism without inheritance").
//!
//! Provider selection is grounded on `engine/provider/mod.rs`'s
//! `CliProvider` trait + `resolve_provider(kind)` factory: here the two
//! backends are HTTP-based rather than CLI-based, so the trait exposes a
//! single `complete` method instead of argv-building, but the shape —
//! a closed enum of kinds, a trait each kind implements, and a factory
//! function picking the concrete implementation — is the same.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which backend answers `LlmClient` calls (`spec.md` §4.7's
/// `useCopilotFlag`/key-presence rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Copilot,
    OpenAiCompatible,
}

/// Resolve the active provider kind from config, exactly mirroring the
/// rule `spec.md` §4.7 states: Copilot if `use_copilot` is set AND a
/// Copilot token is present; else OpenAI-compatible if a key is present;
/// else AI features are disabled.
pub fn resolve_provider_kind(use_copilot: bool, copilot_token: &Option<String>, openai_key: &Option<String>) -> Option<LlmProviderKind> {
    if use_copilot && copilot_token.is_some() {
        Some(LlmProviderKind::Copilot)
    } else if openai_key.is_some() {
        Some(LlmProviderKind::OpenAiCompatible)
    } else {
        None
    }
}

/// Abstraction over LLM backends. Each backend knows how to turn a prompt
/// into an authenticated HTTP call and pull the answer text back out.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    fn provider_name(&self) -> &'static str;
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AppError>;
}

struct CopilotBackend {
    http: reqwest::Client,
    token: String,
}

struct OpenAiCompatibleBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl LlmBackend for CopilotBackend {
    fn provider_name(&self) -> &'static str {
        "copilot"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AppError> {
        let body = json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
        });
        let resp: ChatResponse = self
            .http
            .post("https://api.githubcopilot.com/chat/completions")
            .bearer_auth(&self.token)
            .header("Copilot-Integration-Id", "vscode-chat")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Network(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))?;
        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Decode("empty choices".into()))
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatibleBackend {
    fn provider_name(&self) -> &'static str {
        "openai_compatible"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AppError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
        });
        let resp: ChatResponse = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Network(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))?;
        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Decode("empty choices".into()))
    }
}

/// Build the concrete backend for `kind` (the `resolve_provider` factory
/// analogue). Credentials are the caller's responsibility to supply.
pub fn resolve_backend(
    kind: LlmProviderKind,
    copilot_token: Option<String>,
    openai_base_url: Option<String>,
    openai_key: Option<String>,
    openai_model: Option<String>,
) -> Result<Box<dyn LlmBackend>, AppError> {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("failed to build reqwest client");
    match kind {
        LlmProviderKind::Copilot => {
            let token = copilot_token.ok_or_else(|| AppError::Precondition("missing copilot token".into()))?;
            Ok(Box::new(CopilotBackend { http, token }))
        }
        LlmProviderKind::OpenAiCompatible => {
            let api_key = openai_key.ok_or_else(|| AppError::Precondition("missing openai key".into()))?;
            Ok(Box::new(OpenAiCompatibleBackend {
                http,
                base_url: openai_base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                api_key,
                model: openai_model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
            }))
        }
    }
}

/// Front door the controller calls — the three operations `spec.md` §4.7
/// names for the LLM client.
pub struct LlmClient {
    backend: Box<dyn LlmBackend>,
}

impl LlmClient {
    pub fn new(backend: Box<dyn LlmBackend>) -> Self {
        LlmClient { backend }
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend.provider_name()
    }

    pub async fn describe(&self, resource_type: &str, resource_name: &str, serialised_details: &str) -> Result<String, AppError> {
        let system = "You explain cloud resources to an operator in two or three sentences.";
        let prompt = format!(
            "Resource type: {resource_type}\nResource name: {resource_name}\nDetails:\n{serialised_details}"
        );
        self.backend.complete(system, &prompt).await
    }

    pub async fn summarise_groups(&self, group_names: &[String]) -> Result<String, AppError> {
        let system = "You summarise a list of cloud resource groups for an operator in a short paragraph.";
        let prompt = group_names.join(", ");
        self.backend.complete(system, &prompt).await
    }

    pub async fn ask(&self, prompt: &str, context: &str) -> Result<String, AppError> {
        let system = format!("You are a cloud operations assistant. Context:\n{context}");
        self.backend.complete(&system, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copilot_selected_when_flag_set_and_token_present() {
        let kind = resolve_provider_kind(true, &Some("tok".into()), &None);
        assert_eq!(kind, Some(LlmProviderKind::Copilot));
    }

    #[test]
    fn openai_selected_when_flag_unset_but_key_present() {
        let kind = resolve_provider_kind(false, &None, &Some("key".into()));
        assert_eq!(kind, Some(LlmProviderKind::OpenAiCompatible));
    }

    #[test]
    fn falls_back_to_openai_when_copilot_flag_set_without_token() {
        let kind = resolve_provider_kind(true, &None, &Some("key".into()));
        assert_eq!(kind, Some(LlmProviderKind::OpenAiCompatible));
    }

    #[test]
    fn none_when_no_credentials_present() {
        let kind = resolve_provider_kind(false, &None, &None);
        assert_eq!(kind, None);
    }
}
