//! Configuration Types
//!
//! 定义所有配置结构体

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::{AudioFormat, QualityTier, SpeechVoice};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// TTS 配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 远程合成服务配置
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// 音频缓存配置
    #[serde(default)]
    pub audio_cache: AudioCacheConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// TTS 配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TtsConfig {
    /// 期望的音质档位: basic, standard, hd
    #[serde(default)]
    pub quality: QualityTier,

    /// 远程音色
    #[serde(default = "default_voice")]
    pub voice: String,

    /// 远程合成的音频格式: mp3, opus, aac, flac, wav
    #[serde(default)]
    pub audio_format: AudioFormat,

    /// 语速倍率 (0.25 - 4.0)
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f32,

    /// 系统语音语速（词/分钟，仅免费档位）
    #[serde(default = "default_rate")]
    pub rate: u32,

    /// 系统语音音量 (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_voice() -> String {
    SpeechVoice::default().as_str().to_string()
}

fn default_speed_multiplier() -> f32 {
    1.0
}

fn default_rate() -> u32 {
    180
}

fn default_volume() -> f32 {
    0.9
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            quality: QualityTier::default(),
            voice: default_voice(),
            audio_format: AudioFormat::default(),
            speed_multiplier: default_speed_multiplier(),
            rate: default_rate(),
            volume: default_volume(),
        }
    }
}

/// 远程合成服务配置
///
/// 凭证本身从进程环境变量读取，不出现在配置文件中
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 保存凭证的环境变量名
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl OpenAiConfig {
    /// 从环境变量读取凭证，空值视为缺失
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// 音频缓存配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioCacheConfig {
    /// 缓存目录
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// 最大缓存大小（MB）
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,

    /// 条目最大年龄（天）
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,

    /// 启动时清扫过期条目
    #[serde(default = "default_cleanup_on_startup")]
    pub cleanup_on_startup: bool,

    /// 触发容量淘汰的阈值（占 max_size_mb 的比例）
    #[serde(default = "default_cleanup_threshold")]
    pub cleanup_threshold: f64,
}

/// 用户主目录下的 `.chirpy/audio_cache`
pub fn default_cache_dir() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from);

    match home {
        Some(home) => home.join(".chirpy").join("audio_cache"),
        None => PathBuf::from(".chirpy").join("audio_cache"),
    }
}

fn default_max_size_mb() -> u64 {
    500
}

fn default_max_age_days() -> u64 {
    30
}

fn default_cleanup_on_startup() -> bool {
    true
}

fn default_cleanup_threshold() -> f64 {
    0.8
}

impl Default for AudioCacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            max_size_mb: default_max_size_mb(),
            max_age_days: default_max_age_days(),
            cleanup_on_startup: default_cleanup_on_startup(),
            cleanup_threshold: default_cleanup_threshold(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.tts.quality, QualityTier::Hd);
        assert_eq!(config.tts.voice, "alloy");
        assert_eq!(config.tts.audio_format, AudioFormat::Mp3);
        assert_eq!(config.tts.rate, 180);
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.audio_cache.max_age_days, 30);
        assert_eq!(config.audio_cache.cleanup_threshold, 0.8);
        assert!(config.audio_cache.cleanup_on_startup);
    }

    #[test]
    fn test_default_cache_dir_layout() {
        let dir = default_cache_dir();
        assert!(dir.ends_with(".chirpy/audio_cache"));
    }

    #[test]
    fn test_api_key_missing_env() {
        let config = OpenAiConfig {
            api_key_env: "CHIRPY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..OpenAiConfig::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [tts]
            quality = "standard"
            voice = "nova"

            [audio_cache]
            max_size_mb = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.tts.quality, QualityTier::Standard);
        assert_eq!(config.tts.voice, "nova");
        assert_eq!(config.tts.speed_multiplier, 1.0);
        assert_eq!(config.audio_cache.max_size_mb, 50);
        assert_eq!(config.audio_cache.max_age_days, 30);
    }
}
