use thiserror::Error;

/// # Summary
/// 解读服务错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum InsightError {
    /// 未配置大模型 API Key
    #[error("OpenAI API key is not configured")]
    NotConfigured,

    /// 网络连接或传输错误
    #[error("Network error: {0}")]
    Network(String),

    /// 模型服务返回非成功状态码
    #[error("OpenAI request failed ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// 模型返回内容无法解析为解读结构
    #[error("Parse error: {0}")]
    Parse(String),
}
