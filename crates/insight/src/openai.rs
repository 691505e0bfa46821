use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stockscope_core::analysis::entity::ScoreSet;
use stockscope_core::common::Symbol;
use stockscope_core::config::InsightConfig;
use stockscope_core::insight::entity::Insight;
use stockscope_core::insight::error::InsightError;
use stockscope_core::insight::port::InsightProvider;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You produce safe educational insights.";

/// # Summary
/// OpenAI 解读服务的连接参数。
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// 接口根地址，可指向任意 OpenAI 兼容服务
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            timeout_secs: 60,
        }
    }

    /// # Summary
    /// 从应用配置构建连接参数。
    ///
    /// # Returns
    /// * 未配置或配置为空白的 API Key 时返回 `None`。
    pub fn from_settings(settings: &InsightConfig) -> Option<Self> {
        let api_key = settings.api_key.as_deref().map(str::trim).unwrap_or("");
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            api_key: api_key.to_string(),
            api_base: settings.api_base.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout_secs: settings.timeout_secs,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// # Summary
/// 基于 Chat Completions 的解读提供者。
///
/// # Invariants
/// * `api_key` 非空。
/// * 请求要求模型以 JSON 对象作答。
pub struct OpenAiInsightProvider {
    config: OpenAiConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// # Summary
/// 组装发送给模型的用户提示词。
///
/// # Arguments
/// * `symbol` - 证券代码。
/// * `scores` - 评分结果，以 JSON 形式嵌入提示词。
pub fn build_prompt(symbol: &Symbol, scores: &ScoreSet) -> Result<String, InsightError> {
    let scores_json =
        serde_json::to_string(scores).map_err(|e| InsightError::Parse(e.to_string()))?;
    Ok(format!(
        "You are an investing learning coach. Give a concise educational summary for {} using these scores:\n{}\nReturn JSON with keys: headline, summary, nextStep.",
        symbol, scores_json
    ))
}

/// # Summary
/// 从模型回复中提取解读。
///
/// # Logic
/// 1. 无候选或内容为空时返回占位解读。
/// 2. 否则把内容按 JSON 解析为 `Insight`。
fn parse_reply(response: ChatResponse) -> Result<Insight, InsightError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty());

    match content {
        None => Ok(Insight::unavailable()),
        Some(text) => serde_json::from_str::<Insight>(&text)
            .map_err(|e| InsightError::Parse(format!("Invalid insight JSON: {}", e))),
    }
}

impl OpenAiInsightProvider {
    /// # Summary
    /// 创建解读提供者。
    ///
    /// # Logic
    /// 1. 校验 API Key 非空。
    /// 2. 以配置的超时初始化 HTTP 客户端。
    ///
    /// # Returns
    /// * API Key 为空时返回 `InsightError::NotConfigured`。
    pub fn new(config: OpenAiConfig) -> Result<Self, InsightError> {
        if config.api_key.trim().is_empty() {
            return Err(InsightError::NotConfigured);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InsightError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl InsightProvider for OpenAiInsightProvider {
    /// # Summary
    /// 请求模型对评分给出解读。
    ///
    /// # Logic
    /// 1. 组装系统消息与用户提示词。
    /// 2. 以 Bearer 认证 POST 到 `/chat/completions`。
    /// 3. 非 2xx 状态返回 `InsightError::Upstream`，携带状态码与响应体。
    /// 4. 解析首个候选的内容。
    async fn explain(&self, symbol: &Symbol, scores: &ScoreSet) -> Result<Insight, InsightError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(symbol, scores)?,
                },
            ],
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!("Requesting insight for {} from {}", symbol, self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Insight request for {} failed with HTTP {}", symbol, status);
            return Err(InsightError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Parse(e.to_string()))?;
        parse_reply(reply)
    }
}
