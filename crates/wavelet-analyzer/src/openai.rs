//! OpenAI chat-completions backend.
//!
//! Both operations ask for a `json_object` response and run the returned
//! JSON through the lenient extractors in `sanitize`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wavelet_core::{Influencer, Platform, Post};

use crate::error::AnalysisError;
use crate::{sanitize, ContentAnalysis, ContentAnalyzer, TrendBriefData};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const BRIEF_SYSTEM_PROMPT: &str = "You are Wavelet, an AI agent created by UENO that specializes in \
influencer monitoring and trend analysis for brand teams. Analyze the provided social media data \
and generate a comprehensive trend brief. Focus on actionable insights for brand strategy. \
Respond with JSON in this exact format:
{
  \"summary\": \"Executive summary of key findings\",
  \"keyTrends\": [\"trend1\", \"trend2\", \"trend3\"],
  \"opportunities\": [\"opportunity1\", \"opportunity2\"],
  \"alerts\": [\"alert1\", \"alert2\"],
  \"topTopics\": [{\"name\": \"topic\", \"mentions\": 50, \"growth\": 25.5}]
}";

fn analysis_system_prompt(platform: Platform) -> String {
    format!(
        "You are an expert social media content analyst. Analyze the following {platform} post \
and provide a comprehensive analysis. Respond with JSON in this exact format:
{{
  \"summary\": \"Brief 1-2 sentence summary\",
  \"sentiment\": \"positive|negative|neutral\",
  \"sentimentScore\": 0.85,
  \"topics\": [\"topic1\", \"topic2\"],
  \"keyInsights\": [\"insight1\", \"insight2\"]
}}"
    )
}

pub struct OpenAiAnalyzer {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiAnalyzer {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, AnalysisError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Send one system + user exchange and parse the reply as JSON.
    async fn complete_json(
        &self,
        system: &str,
        user: &str,
    ) -> Result<serde_json::Value, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: system,
                },
                WireMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!(model = %self.model, "openai: chat request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: body.chars().take(300).collect(),
            });
        }

        let chat: ChatResponse =
            serde_json::from_str(&body).map_err(|e| AnalysisError::Deserialize {
                context: "chat completion".to_string(),
                source: e,
            })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AnalysisError::EmptyResponse)?;

        serde_json::from_str(&content).map_err(|e| AnalysisError::Deserialize {
            context: "model output".to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl ContentAnalyzer for OpenAiAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        platform: Platform,
    ) -> Result<ContentAnalysis, AnalysisError> {
        let value = self
            .complete_json(&analysis_system_prompt(platform), text)
            .await?;
        Ok(sanitize::content_analysis(&value))
    }

    async fn generate_brief(
        &self,
        posts: &[Post],
        influencers: &[Influencer],
    ) -> Result<TrendBriefData, AnalysisError> {
        let posts_data: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                json!({
                    "content": p.content,
                    "platform": p.platform,
                    "sentiment": p.sentiment,
                    "topics": p.topics,
                    "likes": p.likes,
                    "comments": p.comments,
                })
            })
            .collect();
        let user = format!(
            "Analyze these {} posts from {} influencers: {}",
            posts.len(),
            influencers.len(),
            serde_json::Value::Array(posts_data)
        );

        let value = self.complete_json(BRIEF_SYSTEM_PROMPT, &user).await?;
        Ok(sanitize::trend_brief(&value))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
