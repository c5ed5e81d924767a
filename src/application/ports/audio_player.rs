//! Audio Player Port - 本机音频播放

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 播放错误
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// 当前平台没有可用的播放方式，运行时无法恢复
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("No audio player found (tried: {0})")]
    NoPlayerFound(String),

    #[error("Player {player} failed: {reason}")]
    PlayerFailed { player: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Player Port
///
/// 播放指定音频文件，播放完毕后返回
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    async fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}
