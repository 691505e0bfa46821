use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use stockscope_core::cache::error::CacheError;
use stockscope_core::cache::port::Cache;
use stockscope_core::common::time::{RealTimeProvider, TimeProvider};

/// 缓存条目：数据与绝对过期时刻
struct Entry {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// # Summary
/// 基于 DashMap 的带过期时间的内存缓存实现。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - `now >= expires_at` 的条目视为不存在，读取时顺带淘汰。
/// - 不做容量限制，进程重启即丢失。
pub struct MemCache {
    // 线程安全的 KV 存储容器
    storage: DashMap<String, Entry>,
    // 过期判断所依赖的时钟
    clock: Arc<dyn TimeProvider>,
}

impl MemCache {
    /// # Summary
    /// 使用系统真实时钟创建缓存。
    pub fn new() -> Self {
        Self::with_clock(Arc::new(RealTimeProvider))
    }

    /// # Summary
    /// 使用指定时钟创建缓存，测试中可注入虚拟时钟。
    ///
    /// # Arguments
    /// * `clock`: 时间供给器。
    ///
    /// # Returns
    /// * `Self` - 初始化的缓存实例。
    pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }

    /// # Summary
    /// 清理所有已过期条目。
    ///
    /// # Returns
    /// * `usize` - 被清理的条目数量。
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.storage.len();
        self.storage.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.storage.len())
    }

    /// 当前持有的条目数 (含尚未清理的过期条目)
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemCache {
    /// # Summary
    /// 写入原始字节数据。
    ///
    /// # Logic
    /// 以 `now + ttl` 作为过期时刻插入哈希表，存在同名 Key 则覆盖。
    /// `ttl` 非正时条目立即不可见。
    async fn set_raw(&self, key: &str, value: Vec<u8>, ttl: TimeDelta) -> Result<(), CacheError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.storage
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    /// # Summary
    /// 获取原始字节数据。
    ///
    /// # Logic
    /// 1. 检索 Key 对应条目。
    /// 2. 已过期则移除并返回 None，否则克隆数据返回。
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = self.clock.now();
        match self.storage.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }
        self.storage
            .remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    /// # Summary
    /// 删除指定键，无论键是否存在均返回 Ok。
    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.storage.remove(key);
        Ok(())
    }
}
