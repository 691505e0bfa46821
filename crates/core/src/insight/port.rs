use crate::analysis::entity::ScoreSet;
use crate::common::Symbol;
use crate::insight::entity::Insight;
use crate::insight::error::InsightError;
use async_trait::async_trait;

/// # Summary
/// 将评分结果转述为自然语言解读的外部服务接口。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持并发调用。
/// - 解读只是对已有分数的措辞，不得改变分数本身。
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// # Summary
    /// 为指定证券的评分生成解读。
    ///
    /// # Logic
    /// 1. 将代码与分数组装为提示词。
    /// 2. 调用模型服务并解析结构化结果。
    ///
    /// # Arguments
    /// * `symbol` - 证券代码。
    /// * `scores` - 评分引擎的输出。
    ///
    /// # Returns
    /// * 成功返回 `Insight`。
    /// * 失败返回 `Err(InsightError)`。
    async fn explain(&self, symbol: &Symbol, scores: &ScoreSet) -> Result<Insight, InsightError>;
}
