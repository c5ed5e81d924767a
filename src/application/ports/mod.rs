//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_cache;
mod audio_player;
mod speech_engine;
mod tts_engine;
mod tts_provider;

pub use audio_cache::{
    generate_cache_key, AudioCachePort, CacheError, CacheStats, CleanupSummary,
};
pub(crate) use audio_cache::{bytes_to_mb, mb_to_bytes};
pub use audio_player::{AudioPlayerPort, PlaybackError};
pub use speech_engine::{LocalSpeechEnginePort, SpeechEngineError};
pub use tts_engine::{SpeechSynthesisPort, SynthesisRequest, TtsError};
pub use tts_provider::TtsProviderPort;
