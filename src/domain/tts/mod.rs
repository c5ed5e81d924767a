//! TTS Context - 语音合成上下文

mod errors;
mod value_objects;

pub use errors::TtsDomainError;
pub use value_objects::{AudioFormat, QualityTier, SpeechVoice, SynthesisModel};
