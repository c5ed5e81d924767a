//! Domain Layer - 领域层
//!
//! TTS Context: 音质档位、音频格式、音色与合成模型等值对象

pub mod tts;

pub use tts::{AudioFormat, QualityTier, SpeechVoice, SynthesisModel, TtsDomainError};
