//! # 配置加载
//!
//! 优先级由低到高：内置默认值、可选的 `stockscope.toml`、`STOCKSCOPE__SECTION__KEY` 环境变量。
//! 之后再用通用的 `FMP_API_KEY` / `OPENAI_API_KEY` 补齐未配置的密钥。

use config::{Config, ConfigError, Environment, File};
use stockscope_core::config::AppConfig;

const CONFIG_FILE: &str = "stockscope";
const ENV_PREFIX: &str = "STOCKSCOPE";

/// # Summary
/// 从文件与环境变量加载应用配置。
///
/// # Returns
/// 配置格式错误时返回 `ConfigError`；文件缺失不视为错误。
pub fn load() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(apply_key_fallbacks(config, |name| std::env::var(name).ok()))
}

/// # Summary
/// 用通用环境变量补齐缺失的 API Key。
///
/// # Logic
/// 1. 行情 Key 为空时读取 `FMP_API_KEY`。
/// 2. 解读 Key 缺失或空白时依次读取 `OPEN_AI_API_KEY`、`OPENAI_API_KEY`。
pub fn apply_key_fallbacks(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    let non_blank = |v: String| {
        let trimmed = v.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    if config.provider.api_key.trim().is_empty() {
        if let Some(key) = lookup("FMP_API_KEY").and_then(non_blank) {
            config.provider.api_key = key;
        }
    }

    let has_insight_key = config
        .insight
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if !has_insight_key {
        config.insight.api_key = lookup("OPEN_AI_API_KEY")
            .and_then(non_blank)
            .or_else(|| lookup("OPENAI_API_KEY").and_then(non_blank));
    }

    config
}
