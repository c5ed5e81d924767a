//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod bootstrap;
pub mod persistence;

pub use bootstrap::build_tts_service;
pub use persistence::file_cache::{FileAudioCache, FileCacheConfig};
