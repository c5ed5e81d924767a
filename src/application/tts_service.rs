//! TTS Service - 多档位 TTS 协调
//!
//! 持有 ProviderRegistry，负责音质选择和唯一的回退规则：
//! 付费档位失败时，经 Basic 档位重试一次。
//!
//! 公开方法都不返回错误：失败在内部记录日志后以 false / 空结果表达。

use std::sync::Arc;

use crate::application::ports::{AudioCachePort, CacheStats, CleanupSummary, TtsProviderPort};
use crate::domain::QualityTier;

/// 只有超过该金额才记录费用预估
const COST_LOG_THRESHOLD: f64 = 0.01;

/// 远程提供方的注册信息
///
/// Standard 与 Hd 两个档位指向同一个实例，因此也共享同一个缓存
pub struct RemoteRegistration {
    provider: Arc<dyn TtsProviderPort>,
    cache: Arc<dyn AudioCachePort>,
    tiers: [QualityTier; 2],
}

impl RemoteRegistration {
    pub fn provider(&self) -> &Arc<dyn TtsProviderPort> {
        &self.provider
    }

    pub fn cache(&self) -> &Arc<dyn AudioCachePort> {
        &self.cache
    }

    pub fn tiers(&self) -> &[QualityTier] {
        &self.tiers
    }
}

/// 档位 → 提供方映射，启动时构建一次
///
/// Basic 始终存在；Standard/Hd 仅在远程提供方可用时存在
pub struct ProviderRegistry {
    basic: Arc<dyn TtsProviderPort>,
    remote: Option<RemoteRegistration>,
}

impl ProviderRegistry {
    pub fn new(basic: Arc<dyn TtsProviderPort>) -> Self {
        Self {
            basic,
            remote: None,
        }
    }

    /// 注册远程提供方；不可用时忽略
    pub fn with_remote(
        mut self,
        provider: Arc<dyn TtsProviderPort>,
        cache: Arc<dyn AudioCachePort>,
    ) -> Self {
        if provider.is_available() {
            self.remote = Some(RemoteRegistration {
                provider,
                cache,
                tiers: [QualityTier::Standard, QualityTier::Hd],
            });
        } else {
            tracing::info!(
                provider = provider.name(),
                "Remote TTS provider unavailable, only basic quality registered"
            );
        }
        self
    }

    pub fn get(&self, tier: QualityTier) -> Option<&Arc<dyn TtsProviderPort>> {
        match tier {
            QualityTier::Basic => Some(&self.basic),
            _ => self
                .remote
                .as_ref()
                .filter(|remote| remote.tiers.contains(&tier))
                .map(|remote| &remote.provider),
        }
    }

    pub fn contains(&self, tier: QualityTier) -> bool {
        self.get(tier).is_some()
    }

    /// 已注册的档位（按保真度升序）
    pub fn qualities(&self) -> Vec<QualityTier> {
        QualityTier::ALL
            .into_iter()
            .filter(|tier| self.contains(*tier))
            .collect()
    }

    pub fn basic(&self) -> &Arc<dyn TtsProviderPort> {
        &self.basic
    }

    pub fn remote(&self) -> Option<&RemoteRegistration> {
        self.remote.as_ref()
    }

    pub fn len(&self) -> usize {
        self.qualities().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// TTS Service
pub struct TtsService {
    registry: ProviderRegistry,
    /// 请求的音质档位
    current_quality: QualityTier,
    /// 实际使用的档位（请求档位未注册时按回退顺序解析）
    active_tier: QualityTier,
}

impl TtsService {
    pub fn new(registry: ProviderRegistry, quality: QualityTier) -> Self {
        let active_tier = Self::resolve(&registry, quality);
        if let Some(provider) = registry.get(active_tier) {
            provider.select_quality(active_tier);
        }

        tracing::info!(
            providers = registry.len(),
            current_quality = %quality,
            active_tier = %active_tier,
            available = ?registry.qualities(),
            "TTS service initialized"
        );

        Self {
            registry,
            current_quality: quality,
            active_tier,
        }
    }

    /// 请求档位已注册则直接使用，否则从固定顺序 [Hd, Standard, Basic] 中取第一个已注册的
    fn resolve(registry: &ProviderRegistry, quality: QualityTier) -> QualityTier {
        if registry.contains(quality) {
            return quality;
        }

        for tier in QualityTier::FALLBACK_ORDER {
            if registry.contains(tier) {
                tracing::info!(requested = %quality, tier = %tier, "Falling back to {} quality", tier);
                return tier;
            }
        }

        QualityTier::Basic
    }

    pub fn current_quality(&self) -> QualityTier {
        self.current_quality
    }

    pub fn active_tier(&self) -> QualityTier {
        self.active_tier
    }

    fn current_provider(&self) -> &Arc<dyn TtsProviderPort> {
        self.registry
            .get(self.active_tier)
            .unwrap_or_else(|| self.registry.basic())
    }

    /// 朗读文本，播放结束后返回
    ///
    /// 失败时经 Basic 重试一次；只有请求档位本身是 Basic 时失败才是最终结果。
    /// 请求 Hd 但只注册了 Basic 时，Basic 会被调用两次
    pub async fn speak(&self, text: &str, voice: Option<&str>) -> bool {
        if text.trim().is_empty() {
            return true;
        }

        let provider = self.current_provider();

        let cost = provider.estimate_cost(text);
        if cost > COST_LOG_THRESHOLD {
            tracing::info!(tier = %self.active_tier, "Estimated cost: ${:.4}", cost);
        }

        if provider.speak(text, voice).await {
            return true;
        }

        if self.current_quality == QualityTier::Basic {
            return false;
        }

        tracing::warn!(
            tier = %self.active_tier,
            "Primary TTS failed, falling back to system TTS"
        );
        self.registry.basic().speak(text, voice).await
    }

    /// 切换音质档位；档位未注册时保持原状态并返回 false
    pub fn set_quality(&mut self, tier: QualityTier) -> bool {
        let Some(provider) = self.registry.get(tier) else {
            tracing::warn!(tier = %tier, "TTS quality not available");
            return false;
        };

        provider.select_quality(tier);
        self.current_quality = tier;
        self.active_tier = tier;
        tracing::info!(tier = %tier, "TTS quality changed");
        true
    }

    pub fn available_qualities(&self) -> Vec<QualityTier> {
        self.registry.qualities()
    }

    pub fn cost_estimate(&self, text: &str) -> f64 {
        self.current_provider().estimate_cost(text)
    }

    pub fn is_available(&self) -> bool {
        !self.registry.is_empty()
    }

    fn remote_cache(&self) -> Option<&Arc<dyn AudioCachePort>> {
        self.registry.remote().map(|remote| remote.cache())
    }

    /// 远程提供方的缓存统计；未注册远程提供方时为 None
    pub async fn cache_stats(&self) -> Option<CacheStats> {
        match self.remote_cache() {
            Some(cache) => Some(cache.stats().await),
            None => None,
        }
    }

    /// 清空远程提供方的缓存；未注册时返回 0
    pub async fn clear_cache(&self) -> usize {
        match self.remote_cache() {
            Some(cache) => cache.clear().await,
            None => 0,
        }
    }

    /// 手动清扫过期缓存；未注册远程提供方时为 None
    pub async fn cleanup_cache(&self) -> Option<CleanupSummary> {
        match self.remote_cache() {
            Some(cache) => Some(cache.sweep_expired().await),
            None => None,
        }
    }
}
