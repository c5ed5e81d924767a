//! File Cache - 基于文件系统的音频缓存

mod audio_cache;

pub use audio_cache::{FileAudioCache, FileCacheConfig};
