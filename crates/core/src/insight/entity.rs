use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Summary
/// 大模型对评分结果的教育性解读。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[schema(example = "Solid value, modest momentum")]
    pub headline: String,
    pub summary: String,
    // 建议用户下一步学习或关注的方向
    #[serde(default)]
    pub next_step: String,
}

impl Insight {
    /// 模型未返回可用内容时的占位解读
    pub fn unavailable() -> Self {
        Self {
            headline: "AI Insight".to_string(),
            summary: "No insight available.".to_string(),
            next_step: String::new(),
        }
    }
}
