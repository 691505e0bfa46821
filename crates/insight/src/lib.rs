//! # `stockscope-insight` - 评分解读
//!
//! 通过 OpenAI 兼容的 Chat Completions 接口，把评分结果转述为面向初学者的教育性解读。

pub mod openai;
