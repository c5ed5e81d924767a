//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（chirpy.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{default_cache_dir, AppConfig};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["chirpy", "chirpy.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `CHIRPY_TTS__QUALITY=standard`
/// - `CHIRPY_TTS__VOICE=nova`
/// - `CHIRPY_AUDIO_CACHE__MAX_SIZE_MB=200`
/// - `CHIRPY_OPENAI__TIMEOUT_SECS=30`
///
/// 凭证不走这里，而是由 `openai.api_key_env` 指定的环境变量提供
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("tts.quality", "hd")?
        .set_default("tts.voice", "alloy")?
        .set_default("tts.audio_format", "mp3")?
        .set_default("tts.speed_multiplier", 1.0)?
        .set_default("tts.rate", 180)?
        .set_default("tts.volume", 0.9)?
        .set_default("openai.base_url", "https://api.openai.com/v1")?
        .set_default("openai.timeout_secs", 60)?
        .set_default("openai.api_key_env", "OPENAI_API_KEY")?
        .set_default(
            "audio_cache.dir",
            default_cache_dir().to_string_lossy().to_string(),
        )?
        .set_default("audio_cache.max_size_mb", 500)?
        .set_default("audio_cache.max_age_days", 30)?
        .set_default("audio_cache.cleanup_on_startup", true)?
        .set_default("audio_cache.cleanup_threshold", 0.8)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 前缀: CHIRPY_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix("CHIRPY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if !(0.25..=4.0).contains(&config.tts.speed_multiplier) {
        return Err(ConfigError::ValidationError(format!(
            "Speed multiplier must be between 0.25 and 4.0, got {}",
            config.tts.speed_multiplier
        )));
    }

    if !(50..=500).contains(&config.tts.rate) {
        return Err(ConfigError::ValidationError(format!(
            "TTS rate must be between 50 and 500 words/min, got {}",
            config.tts.rate
        )));
    }

    if !(0.0..=1.0).contains(&config.tts.volume) {
        return Err(ConfigError::ValidationError(format!(
            "TTS volume must be between 0.0 and 1.0, got {}",
            config.tts.volume
        )));
    }

    if config.openai.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Request timeout cannot be 0".to_string(),
        ));
    }

    if config.audio_cache.max_size_mb == 0 {
        return Err(ConfigError::ValidationError(
            "Cache size limit cannot be 0".to_string(),
        ));
    }

    if config.audio_cache.max_age_days == 0 {
        return Err(ConfigError::ValidationError(
            "Cache max age cannot be 0".to_string(),
        ));
    }

    let threshold = config.audio_cache.cleanup_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "Cache cleanup threshold must be in (0, 1], got {}",
            threshold
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Chirpy TTS Configuration ===");
    tracing::info!("Quality: {}", config.tts.quality);
    tracing::info!("Voice: {}", config.tts.voice);
    tracing::info!("Audio Format: {}", config.tts.audio_format);
    tracing::info!("Speed Multiplier: {}", config.tts.speed_multiplier);
    tracing::info!("System Rate/Volume: {} wpm / {}", config.tts.rate, config.tts.volume);
    tracing::info!("Remote API: {}", config.openai.base_url);
    tracing::info!("Remote Timeout: {}s", config.openai.timeout_secs);
    tracing::info!(
        "Remote Credential ({}): {}",
        config.openai.api_key_env,
        if config.openai.api_key().is_some() { "set" } else { "not set" }
    );
    tracing::info!("Cache Directory: {:?}", config.audio_cache.dir);
    tracing::info!(
        "Cache Limits: {} MB / {} days (threshold {})",
        config.audio_cache.max_size_mb,
        config.audio_cache.max_age_days,
        config.audio_cache.cleanup_threshold
    );
    tracing::info!("Cache Cleanup On Startup: {}", config.audio_cache.cleanup_on_startup);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("================================");
}
