//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsProvider、SpeechSynthesis、AudioCache、AudioPlayer 等）
//! - tts_service: 多档位 TTS 协调与回退

pub mod ports;
pub mod tts_service;

pub use ports::{
    // Audio cache
    generate_cache_key,
    AudioCachePort,
    CacheError,
    CacheStats,
    CleanupSummary,
    // Playback
    AudioPlayerPort,
    PlaybackError,
    // Local speech engine
    LocalSpeechEnginePort,
    SpeechEngineError,
    // Remote synthesis
    SpeechSynthesisPort,
    SynthesisRequest,
    TtsError,
    // Providers
    TtsProviderPort,
};

pub use tts_service::{ProviderRegistry, RemoteRegistration, TtsService};
