//! AI deletion advice
//!
//! Asks a hosted language model whether a file or folder is safe to delete.
//! The model is reached through an OpenAI-compatible chat-completions
//! endpoint and must answer with a JSON object matching [`Advice`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::types::{format_bytes, Recommendation, RecommendationKind};
use crate::{Error, Result};

/// Message shown to callers whenever advice could not be produced
pub const ADVICE_UNAVAILABLE: &str = "Failed to get AI recommendation.";

/// Facts about the item under consideration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    /// Full path to the file or folder
    pub file_path: String,
    /// e.g. `exe`, `zip`, `folder`
    pub file_type: String,
    /// Human-readable size, e.g. `1.50 GB`
    pub file_size: String,
    pub last_modified: String,
}

impl AdviceRequest {
    /// Describe a catalog recommendation for the model
    pub fn from_recommendation(rec: &Recommendation) -> Self {
        let file_type = match rec.kind {
            RecommendationKind::Folder => "folder".to_string(),
            RecommendationKind::File => rec
                .name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .unwrap_or_else(|| "file".to_string()),
        };

        Self {
            file_path: rec.path.clone(),
            file_type,
            file_size: format_bytes(rec.size),
            last_modified: rec.last_modified.clone(),
        }
    }

    /// Render the prompt sent to the model
    pub fn prompt(&self) -> String {
        format!(
            r#"You are an AI assistant specializing in determining whether a file or folder is safe to delete from a computer system.

You will receive information about a file or folder, including its path, type, size, and last modified date. You must evaluate the information to determine if it is safe to delete.

Consider the following factors:

*   **File Type:** Executable files (.exe, .msi) should be scrutinized for potential vulnerabilities. Archives (.zip, .rar, .7z) may contain valuable data, but could also be old downloaded software with vulnerabilities.
*   **File Age:** Older files are generally safer to delete, assuming they are not part of critical system infrastructure.
*   **Vulnerabilities:** Check if the file type or associated software has known vulnerabilities. For folders, analyze the contents for potentially vulnerable files.
*   **System Stability:** Do not recommend deleting files or folders that are essential for system operation.
*   **Usage Patterns:** Research whether the file extensions are generally associated with user-generated data, or with system-critical applications.

Respond with a JSON object with two fields: "isSafeToDelete" (boolean) and "reason" (string). Set isSafeToDelete to true if you recommend deletion, and provide a detailed reason. If you do not recommend deletion, explain why, including any potential risks.

File Path: {}
File Type: {}
File Size: {}
Last Modified: {}"#,
            self.file_path, self.file_type, self.file_size, self.last_modified
        )
    }
}

/// The model's verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub is_safe_to_delete: bool,
    pub reason: String,
}

/// Produces deletion advice for a single item
#[async_trait]
pub trait DeletionAdvisor: Send + Sync {
    async fn advise(&self, request: &AdviceRequest) -> Result<Advice>;
}

/// Advisor endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Chat-completions URL
    pub api_url: String,
    /// Bearer token; the advisor is disabled without one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    /// Upper bound on one advice round trip, in seconds
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Advisor backed by a chat-completions API
pub struct ChatAdvisor {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatAdvisor {
    /// Build an advisor, or `None` when no API key is configured
    pub fn from_config(client: Client, config: &AdvisorConfig) -> Option<Self> {
        let api_key = config.api_key.as_ref().filter(|k| !k.trim().is_empty())?;
        Some(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: api_key.trim().to_string(),
            model: config.model.clone(),
        })
    }

    /// Extract the advice from a raw chat-completions response body
    fn parse_completion(body: &str) -> Result<Advice> {
        let completion: ChatCompletion = serde_json::from_str(body)?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::AdvisorError("Model returned no content".into()))?;

        serde_json::from_str(content.trim())
            .map_err(|e| Error::AdvisorError(format!("Model output is not valid advice: {}", e)))
    }
}

#[async_trait]
impl DeletionAdvisor for ChatAdvisor {
    #[instrument(skip(self), fields(path = %request.file_path))]
    async fn advise(&self, request: &AdviceRequest) -> Result<Advice> {
        let body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "user", "content": request.prompt() }
            ]
        });

        debug!(model = %self.model, "Requesting deletion advice");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, "Advisor request failed");
            return Err(Error::AdvisorError(format!(
                "Advisor returned {}: {}",
                status, text
            )));
        }

        Self::parse_completion(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installer() -> Recommendation {
        Recommendation {
            id: "rec-001".into(),
            server: "PROD-WEB-01".into(),
            name: "old_installer.exe".into(),
            path: "C:\\Users\\admin\\Downloads\\old_installer.exe".into(),
            size: 157286400,
            kind: RecommendationKind::File,
            last_modified: "2022-01-15".into(),
            reason: "Old/Forgotten File".into(),
        }
    }

    #[test]
    fn test_request_from_file_recommendation() {
        let req = AdviceRequest::from_recommendation(&installer());
        assert_eq!(req.file_type, "exe");
        assert_eq!(req.file_size, "150.00 MB");
        assert_eq!(req.last_modified, "2022-01-15");
    }

    #[test]
    fn test_request_from_folder_recommendation() {
        let mut rec = installer();
        rec.kind = RecommendationKind::Folder;
        rec.name = "temp_logs".into();
        assert_eq!(AdviceRequest::from_recommendation(&rec).file_type, "folder");
    }

    #[test]
    fn test_prompt_includes_item_facts() {
        let prompt = AdviceRequest::from_recommendation(&installer()).prompt();
        assert!(prompt.contains("File Path: C:\\Users\\admin\\Downloads\\old_installer.exe"));
        assert!(prompt.contains("File Type: exe"));
        assert!(prompt.contains("isSafeToDelete"));
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"isSafeToDelete\":true,\"reason\":\"Old installer.\"}"}}]}"#;
        let advice = ChatAdvisor::parse_completion(body).unwrap();
        assert!(advice.is_safe_to_delete);
        assert_eq!(advice.reason, "Old installer.");
    }

    #[test]
    fn test_parse_completion_rejects_free_text() {
        let body = r#"{"choices":[{"message":{"content":"Sure, delete it."}}]}"#;
        assert!(ChatAdvisor::parse_completion(body).is_err());

        let body = r#"{"choices":[]}"#;
        assert!(ChatAdvisor::parse_completion(body).is_err());
    }

    #[test]
    fn test_advisor_requires_key() {
        let client = Client::new();
        assert!(ChatAdvisor::from_config(client.clone(), &AdvisorConfig::default()).is_none());

        let config = AdvisorConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert!(ChatAdvisor::from_config(client, &config).is_some());
    }
}
