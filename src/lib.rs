//! Chirpy - RSS 阅读器的文本朗读子系统
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - TTS 值对象：音质档位、音频格式、音色、合成模型
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsProvider, SpeechSynthesis, AudioCache, AudioPlayer, LocalSpeechEngine）
//! - TtsService: 档位选择与回退
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 远程合成客户端、系统语音、音频播放
//! - Persistence: 合成音频的文件缓存
//! - Bootstrap: 按配置组装服务

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
