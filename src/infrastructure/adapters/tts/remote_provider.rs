//! Remote TTS Provider - 付费远程语音合成
//!
//! 单次 `speak` 的顺序固定：查缓存 → 调用远程 API → 写缓存 → 播放。
//! 合成失败时不写缓存，本层不重试（回退由 TtsService 负责）。

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::application::ports::{
    generate_cache_key, AudioCachePort, AudioPlayerPort, SpeechSynthesisPort, SynthesisRequest,
    TtsProviderPort,
};
use crate::domain::{AudioFormat, QualityTier, SpeechVoice, SynthesisModel};

/// 每百万字符 15 美元
pub const COST_PER_MILLION_CHARS: f64 = 15.0;

/// 远程提供方设置
#[derive(Debug, Clone)]
pub struct RemoteTtsSettings {
    /// 默认音色，为空时使用内置默认值
    pub default_voice: String,
    pub format: AudioFormat,
    pub speed: f32,
    /// 初始音质档位，决定合成模型
    pub quality: QualityTier,
    /// 构造时清扫过期缓存
    pub cleanup_on_startup: bool,
}

impl Default for RemoteTtsSettings {
    fn default() -> Self {
        Self {
            default_voice: SpeechVoice::default().as_str().to_string(),
            format: AudioFormat::Mp3,
            speed: 1.0,
            quality: QualityTier::Hd,
            cleanup_on_startup: true,
        }
    }
}

pub struct RemoteTtsProvider {
    /// 凭证缺失或客户端初始化失败时为 None
    client: Option<Arc<dyn SpeechSynthesisPort>>,
    cache: Arc<dyn AudioCachePort>,
    player: Arc<dyn AudioPlayerPort>,
    settings: RemoteTtsSettings,
    quality: AtomicU8,
}

impl RemoteTtsProvider {
    pub async fn new(
        client: Option<Arc<dyn SpeechSynthesisPort>>,
        cache: Arc<dyn AudioCachePort>,
        player: Arc<dyn AudioPlayerPort>,
        settings: RemoteTtsSettings,
    ) -> Self {
        if client.is_some() {
            tracing::info!(
                quality = %settings.quality,
                format = %settings.format,
                "Remote TTS provider initialized"
            );
            if settings.cleanup_on_startup {
                cache.sweep_expired().await;
            }
        } else {
            tracing::info!("Remote TTS credential not available - provider unavailable");
        }

        let quality = AtomicU8::new(settings.quality.to_u8());
        Self {
            client,
            cache,
            player,
            settings,
            quality,
        }
    }

    pub fn cache(&self) -> Arc<dyn AudioCachePort> {
        self.cache.clone()
    }

    pub fn quality(&self) -> QualityTier {
        QualityTier::from_u8(self.quality.load(Ordering::Relaxed))
    }

    pub fn model(&self) -> SynthesisModel {
        SynthesisModel::for_quality(self.quality())
    }

    /// 显式参数 > 配置的默认音色 > 内置默认音色
    fn resolve_voice(&self, voice: Option<&str>) -> String {
        voice
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| Some(self.settings.default_voice.trim()).filter(|v| !v.is_empty()))
            .unwrap_or(SpeechVoice::default().as_str())
            .to_string()
    }

    fn effective_speed(&self) -> f32 {
        if self.settings.speed > 0.0 {
            self.settings.speed
        } else {
            1.0
        }
    }

    async fn play(&self, path: &Path) -> bool {
        match self.player.play(path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to play audio");
                false
            }
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

#[async_trait]
impl TtsProviderPort for RemoteTtsProvider {
    async fn speak(&self, text: &str, voice: Option<&str>) -> bool {
        if text.trim().is_empty() {
            return true;
        }

        let Some(client) = &self.client else {
            tracing::debug!("Remote TTS unavailable, skipping");
            return false;
        };

        let voice = self.resolve_voice(voice);
        let model = self.model();
        let speed = self.effective_speed();

        let cache_key = generate_cache_key(text, &voice, model.as_str(), speed);
        if let Some(cached) = self.cache.lookup(&cache_key).await {
            tracing::info!(text = %preview(text), "Using cached audio");
            return self.play(&cached).await;
        }

        tracing::info!(model = %model, voice = %voice, "Generating TTS");

        let request = SynthesisRequest {
            model,
            voice,
            input: text.to_string(),
            format: self.settings.format,
            speed,
        };
        let audio_data = match client.synthesize(request).await {
            Ok(audio_data) => audio_data,
            Err(e) => {
                tracing::error!(error = %e, "Remote TTS failed");
                return false;
            }
        };

        let cached = match self.cache.put(&cache_key, &audio_data).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(error = %e, "Failed to cache synthesized audio");
                return false;
            }
        };

        self.play(&cached).await
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn estimate_cost(&self, text: &str) -> f64 {
        text.chars().count() as f64 / 1_000_000.0 * COST_PER_MILLION_CHARS
    }

    fn select_quality(&self, tier: QualityTier) {
        self.quality.store(tier.to_u8(), Ordering::Relaxed);
    }

    fn name(&self) -> &str {
        "remote"
    }
}
