//! Speech Synthesis Port - 远程 TTS 合成抽象
//!
//! 定义远程语音合成 API 的抽象接口，具体实现在 infrastructure/adapters 层。
//! 本层不做重试与退避，失败直接交给调用方处理。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AudioFormat, SynthesisModel};

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成请求
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub model: SynthesisModel,
    /// 音色名称，原样传给远程服务
    pub voice: String,
    /// 要合成的文本
    pub input: String,
    pub format: AudioFormat,
    /// 语速倍率 (0.25 - 4.0)
    pub speed: f32,
}

/// Speech Synthesis Port
///
/// 返回编码后的原始音频字节
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError>;
}
