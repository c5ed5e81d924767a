//! Audio Cache Port - 合成音频缓存
//!
//! 定义内容寻址的音频缓存抽象接口，具体实现为单层目录下的文件存储。
//! 两种相互独立的淘汰策略：
//! - 按年龄：读取时惰性过期 + 启动时主动清扫
//! - 按容量：写入后检查阈值，按修改时间从旧到新淘汰

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Audio Cache 错误
///
/// 批量操作（清扫、淘汰、统计、清空）不返回错误，单个文件失败只跳过；
/// 只有创建缓存目录和写入条目会向上报告
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory {path}: {reason}")]
    DirectoryUnavailable { path: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub file_count: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    /// 最旧文件的年龄（天），空缓存为 0
    pub oldest_file_age_days: f64,
    pub oldest_modified: Option<DateTime<Utc>>,
    pub cache_dir: PathBuf,
    pub max_size_mb: u64,
    pub max_age_days: u64,
}

/// 一次清理的汇总结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub removed_count: usize,
    pub removed_bytes: u64,
}

impl CleanupSummary {
    pub fn removed_mb(&self) -> f64 {
        bytes_to_mb(self.removed_bytes)
    }
}

/// Audio Cache Port
///
/// 键为 `generate_cache_key` 生成的指纹；每个指纹至多对应一个条目，
/// 重复写入直接覆盖
#[async_trait]
pub trait AudioCachePort: Send + Sync {
    /// 查找条目的文件位置
    ///
    /// 文件存在但已过期时顺带删除，并视为未命中
    async fn lookup(&self, cache_key: &str) -> Option<PathBuf>;

    /// 读取条目内容（过期规则同 `lookup`）
    async fn get(&self, cache_key: &str) -> Option<Vec<u8>>;

    /// 写入条目，随后执行一次容量检查
    async fn put(&self, cache_key: &str, audio_data: &[u8]) -> Result<PathBuf, CacheError>;

    /// 删除所有超过最大年龄的条目，幂等
    async fn sweep_expired(&self) -> CleanupSummary;

    /// 总大小超过 `max_size_mb * cleanup_threshold` 时淘汰到 `max_size_mb`
    ///
    /// 未触发淘汰时返回 None
    async fn size_check(&self) -> Option<CleanupSummary>;

    /// 按修改时间从旧到新删除，直到剩余大小不超过 `target_mb`
    async fn evict_to_size(&self, target_mb: f64) -> CleanupSummary;

    async fn stats(&self) -> CacheStats;

    /// 删除所有条目，返回删除数量
    async fn clear(&self) -> usize;
}

/// 生成缓存 key
///
/// md5 覆盖 (text, voice, model, speed) 四元组。每个字段以 `长度:内容` 的形式
/// 写入摘要，任意字段内容都无法伪造字段边界，例如 ("ab", "c") 与 ("a", "bc")
/// 得到不同的 key。不含随机量或机器相关盐值，跨进程稳定。
///
/// speed 使用 `Display` 的最短往返表示，不同的 f32 值总是得到不同的文本
pub fn generate_cache_key(text: &str, voice: &str, model: &str, speed: f32) -> String {
    let speed = speed.to_string();
    let mut context = md5::Context::new();
    for field in [text, voice, model, speed.as_str()] {
        context.consume(field.len().to_string().as_bytes());
        context.consume(b":");
        context.consume(field.as_bytes());
    }
    format!("{:x}", context.compute())
}

pub(crate) fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

pub(crate) fn mb_to_bytes(mb: f64) -> u64 {
    if mb <= 0.0 {
        return 0;
    }
    (mb * 1024.0 * 1024.0) as u64
}
