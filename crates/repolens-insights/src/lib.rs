//! Optional AI-insights collaborator.
//!
//! Sends a profile-derived summary of the repository to an OpenAI-compatible
//! chat endpoint and parses the structured commentary it returns. Strictly
//! best effort: one request, no retries, and every failure surfaces as an
//! [`InsightsError`] the caller renders as "insights unavailable". The
//! engine's own output is never affected.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use repolens_core::config::InsightsConfig;
use repolens_core::profile::RepositoryProfile;
use repolens_core::types::FileEntry;

/// File paths included in the prompt, matching the dashboard's cap.
const PROMPT_PATH_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("insights API returned status {0}")]
    Status(u16),
    #[error("malformed insights response: {0}")]
    Malformed(String),
}

/// Structured commentary for one analyzed repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInsights {
    pub architecture_insights: String,
    pub technology_recommendations: Vec<String>,
    pub code_quality_score: f64,
    pub security_concerns: Vec<String>,
    pub performance_optimizations: Vec<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

const SYSTEM_PROMPT: &str = "You are a senior software architect analyzing repository structures. \
     Provide detailed, actionable insights in JSON format.";

/// Client for the insights endpoint.
pub struct InsightsClient {
    http: Client,
    api_base: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl InsightsClient {
    pub fn new(config: &InsightsConfig) -> Self {
        Self {
            http: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Request insights for an analyzed repository.
    pub async fn analyze(
        &self,
        api_key: &str,
        repo_name: &str,
        profile: &RepositoryProfile,
        entries: &[FileEntry],
    ) -> Result<RepoInsights, InsightsError> {
        let prompt = build_prompt(repo_name, profile, entries);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightsError::Status(status.as_u16()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| InsightsError::Malformed("no content in response".to_string()))?;

        parse_insights(content)
    }
}

/// Assemble the analysis prompt: repository summary, derived profile, and
/// the first `PROMPT_PATH_LIMIT` file paths.
fn build_prompt(repo_name: &str, profile: &RepositoryProfile, entries: &[FileEntry]) -> String {
    let technologies = profile.flags.technologies().join(", ");
    let paths: Vec<&str> = entries
        .iter()
        .take(PROMPT_PATH_LIMIT)
        .map(|e| e.path.as_str())
        .collect();

    format!(
        "Analyze this repository structure and provide insights:\n\n\
         Repository Info:\n\
         - Name: {repo_name}\n\
         - Framework: {}\n\
         - Architecture style: {}\n\
         - Detected technologies: {technologies}\n\
         - Total files: {}\n\n\
         File Structure (first {PROMPT_PATH_LIMIT} files):\n{}\n\n\
         Please provide:\n\
         1. Architecture insights and patterns you observe\n\
         2. Technology recommendations for improvement\n\
         3. Code quality score (1-10)\n\
         4. Potential security concerns\n\
         5. Performance optimization suggestions\n\n\
         Respond in JSON format with keys: architectureInsights, \
         technologyRecommendations, codeQualityScore, securityConcerns, \
         performanceOptimizations",
        profile.framework,
        profile.architecture_style,
        profile.counts.total,
        paths.join("\n"),
    )
}

/// Parse the model's reply, tolerating prose around the JSON object.
fn parse_insights(content: &str) -> Result<RepoInsights, InsightsError> {
    let candidate = extract_json(content).unwrap_or(content);
    serde_json::from_str(candidate).map_err(|e| InsightsError::Malformed(e.to_string()))
}

/// The outermost `{...}` block of the reply, if any.
fn extract_json(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}
