//! TTS Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TtsDomainError {
    #[error("未知的音质档位: {0}")]
    UnknownQuality(String),

    #[error("不支持的音频格式: {0}")]
    UnknownFormat(String),
}
