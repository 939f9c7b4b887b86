use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{Analysis, Assistant, AssistantError, NoticeKind};
use crate::core::task::AiAssistance;

pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API.
///
/// One request per call: no retry, no backoff, and no timeout beyond what
/// reqwest applies.
#[derive(Debug, Clone)]
pub struct AnthropicAssistant {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_url: String,
}

impl AnthropicAssistant {
    pub fn new(api_key: Option<String>, model: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            api_url: api_url.into(),
        }
    }

    /// Verify the key with a minimal request.
    pub async fn verify(&self) -> Result<String, AssistantError> {
        self.complete(None, "Reply with OK", 4).await?;
        Ok("API key valid".to_string())
    }

    async fn complete(
        &self,
        system: Option<&str>,
        user_msg: &str,
        max_tokens: u32,
    ) -> Result<String, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredential)?;

        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "messages": [
                { "role": "user", "content": user_msg }
            ]
        });
        if let Some(system) = system {
            body["system"] = serde_json::Value::String(system.to_string());
        }

        let resp = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        let api_resp: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AssistantError::MalformedResponse(e.to_string()))?;

        first_text_block(&api_resp).map(str::to_string)
    }
}

#[async_trait]
impl Assistant for AnthropicAssistant {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn analyze(&self, text: &str) -> Result<Analysis, AssistantError> {
        let reply = self
            .complete(Some(ANALYZE_SYSTEM_PROMPT), &analyze_prompt(text), 800)
            .await?;
        parse_json(&reply)
    }

    async fn assist(&self, task_title: &str) -> Result<AiAssistance, AssistantError> {
        let reply = self
            .complete(Some(ASSIST_SYSTEM_PROMPT), &assist_prompt(task_title), 800)
            .await?;
        parse_json(&reply)
    }

    async fn notification_message(&self, kind: NoticeKind, task_title: &str) -> String {
        if !self.has_credential() {
            return kind.offline_message(task_title);
        }
        match self.complete(None, &kind.prompt(task_title), 100).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => kind.empty_message().to_string(),
            Err(e) => {
                log::warn!("Notification message request failed: {}", e);
                kind.fallback_message().to_string()
            }
        }
    }
}

const ANALYZE_SYSTEM_PROMPT: &str = "You turn quick notes into tasks. Return ONLY a JSON object, no explanation.\n\n\
     Fields:\n\
     - \"title\": actionable task title (string, required)\n\
     - \"description\": brief context or summary (string)\n\
     - \"category\": category label (string, required)\n\
     - \"priority\": exactly one of \"High\", \"Medium\", \"Low\" (required)\n\
     - \"subtasks\": array of suggested subtask strings (required, may be empty)\n\
     - \"remark\": a witty, hacker-like, or motivational remark, max 10 words (required)\n\
     - \"links\": array of URLs extracted from the input\n";

const ASSIST_SYSTEM_PROMPT: &str = "You help people finish tasks. Return ONLY a JSON object, no explanation.\n\n\
     Fields (all required):\n\
     - \"steps\": array of strings\n\
     - \"proTip\": string\n\
     - \"searchQuery\": string\n\
     - \"resources\": array of strings\n";

pub fn analyze_prompt(input: &str) -> String {
    format!(
        "Analyze this user input: \"{}\".\n\n\
         Rules:\n\
         1. Shopping: if the input is a product URL or mentions \"buy\", categorize as \"Shopping\" and use the product name as the title.\n\
         2. Complex tasks: if the task is broad (e.g. \"Prepare for interview\", \"Plan wedding\"), generate 3-5 concrete, chronological subtasks.\n\
         3. Context: otherwise infer \"Work\", \"Personal\", \"Dev\", or \"Health\".\n\
         4. Links: extract any URLs into the links array.",
        input
    )
}

pub fn assist_prompt(task_title: &str) -> String {
    format!(
        "Provide actionable assistance for the task: \"{}\".\n\
         I need:\n\
         1. 3 concrete, strategic steps to complete it efficiently.\n\
         2. A \"Pro Tip\" or hack related to this task.\n\
         3. A specific web search query I should use to learn more.\n\
         4. 2 keyword-based resource suggestions (e.g. \"Documentation\", \"Local Store\").",
        task_title
    )
}

fn first_text_block(api_resp: &serde_json::Value) -> Result<&str, AssistantError> {
    api_resp["content"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|block| block["text"].as_str())
        .ok_or_else(|| AssistantError::MalformedResponse("no text in API response".to_string()))
}

/// Models sometimes wrap JSON in markdown fences despite being asked not to.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_json<T: DeserializeOwned>(reply: &str) -> Result<T, AssistantError> {
    let json_str = strip_code_fences(reply);
    if json_str.is_empty() {
        return Err(AssistantError::MalformedResponse("empty reply".to_string()));
    }
    serde_json::from_str(json_str)
        .map_err(|e| AssistantError::MalformedResponse(format!("{} (raw: {})", e, reply)))
}
