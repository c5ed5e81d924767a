//! Persistence - 持久化实现
//!
//! - file_cache: 合成音频的文件缓存

pub mod file_cache;
