//! Local Speech Engine Port - 本地语音引擎
//!
//! 阻塞式 "say + wait"：朗读完成后返回。
//! 本地引擎缺失属于正常情况，由系统语音命令兜底。

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechEngineError {
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    #[error("Speech command {command} failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

#[async_trait]
pub trait LocalSpeechEnginePort: Send + Sync {
    async fn say(&self, text: &str) -> Result<(), SpeechEngineError>;

    fn name(&self) -> &str;
}
