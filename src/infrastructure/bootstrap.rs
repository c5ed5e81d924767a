//! Bootstrap - 按配置组装 TtsService
//!
//! Basic 档位始终注册；远程档位需要凭证和可用的缓存目录。

use std::sync::Arc;

use crate::application::ports::SpeechSynthesisPort;
use crate::application::{ProviderRegistry, TtsService};
use crate::config::AppConfig;
use crate::infrastructure::adapters::{
    HttpTtsClient, HttpTtsClientConfig, RemoteTtsProvider, RemoteTtsSettings, SystemAudioPlayer,
    SystemSpeechCommand, SystemSpeechConfig, SystemTtsProvider,
};
use crate::infrastructure::persistence::file_cache::{FileAudioCache, FileCacheConfig};

/// 根据配置构建 TTS 服务
pub async fn build_tts_service(config: &AppConfig) -> TtsService {
    let command = SystemSpeechCommand::new(SystemSpeechConfig {
        rate: config.tts.rate,
        volume: config.tts.volume,
    });
    let basic = Arc::new(SystemTtsProvider::with_command(Arc::new(command)));
    let registry = ProviderRegistry::new(basic);

    let cache_config = FileCacheConfig {
        cache_dir: config.audio_cache.dir.clone(),
        format: config.tts.audio_format,
        max_size_mb: config.audio_cache.max_size_mb,
        max_age_days: config.audio_cache.max_age_days,
        cleanup_threshold: config.audio_cache.cleanup_threshold,
    };

    let registry = match FileAudioCache::new(cache_config).await {
        Ok(cache) => {
            let cache = Arc::new(cache);
            let settings = RemoteTtsSettings {
                default_voice: config.tts.voice.clone(),
                format: config.tts.audio_format,
                speed: config.tts.speed_multiplier,
                quality: config.tts.quality,
                cleanup_on_startup: config.audio_cache.cleanup_on_startup,
            };
            let remote = RemoteTtsProvider::new(
                build_synthesis_client(config),
                cache.clone(),
                Arc::new(SystemAudioPlayer::new()),
                settings,
            )
            .await;

            registry.with_remote(Arc::new(remote), cache)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Audio cache unavailable, remote qualities disabled");
            registry
        }
    };

    TtsService::new(registry, config.tts.quality)
}

/// 凭证缺失或客户端初始化失败时返回 None
fn build_synthesis_client(config: &AppConfig) -> Option<Arc<dyn SpeechSynthesisPort>> {
    let Some(api_key) = config.openai.api_key() else {
        tracing::warn!(
            env = %config.openai.api_key_env,
            "Remote TTS credential not set, paid qualities unavailable"
        );
        return None;
    };

    let client_config = HttpTtsClientConfig::new(api_key)
        .with_base_url(config.openai.base_url.clone())
        .with_timeout(config.openai.timeout_secs);

    match HttpTtsClient::new(client_config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize remote TTS client");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QualityTier;

    fn test_config(dir: &std::path::Path, api_key_env: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.audio_cache.dir = dir.join("audio_cache");
        config.openai.api_key_env = api_key_env.to_string();
        config.openai.base_url = "http://127.0.0.1:9".to_string();
        config
    }

    #[tokio::test]
    async fn test_without_credential_only_basic() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), "CHIRPY_BOOTSTRAP_KEY_NEVER_SET");

        let service = build_tts_service(&config).await;
        assert_eq!(service.available_qualities(), vec![QualityTier::Basic]);
        assert_eq!(service.current_quality(), QualityTier::Hd);
        assert_eq!(service.active_tier(), QualityTier::Basic);
        assert!(service.is_available());
        assert!(service.cache_stats().await.is_none());
    }

    #[tokio::test]
    async fn test_with_credential_registers_remote() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("CHIRPY_BOOTSTRAP_TEST_KEY", "sk-test");
        let mut config = test_config(dir.path(), "CHIRPY_BOOTSTRAP_TEST_KEY");
        config.tts.quality = QualityTier::Standard;

        let service = build_tts_service(&config).await;
        assert_eq!(
            service.available_qualities(),
            vec![QualityTier::Basic, QualityTier::Standard, QualityTier::Hd]
        );
        assert_eq!(service.active_tier(), QualityTier::Standard);

        let stats = service.cache_stats().await.unwrap();
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.cache_dir, dir.path().join("audio_cache"));
        assert!(dir.path().join("audio_cache").is_dir());
    }
}
