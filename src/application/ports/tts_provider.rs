//! TTS Provider Port - 各音质档位共用的提供方契约
//!
//! 免费的本地/系统实现与付费的远程实现都实现此 trait，
//! 由 TtsService 通过 `Arc<dyn TtsProviderPort>` 持有

use async_trait::async_trait;

use crate::domain::QualityTier;

/// TTS Provider Port
#[async_trait]
pub trait TtsProviderPort: Send + Sync {
    /// 合成并播放，播放结束后返回
    ///
    /// 空白文本直接返回 true，不调用任何引擎；其余失败一律返回 false
    async fn speak(&self, text: &str, voice: Option<&str>) -> bool;

    fn is_available(&self) -> bool;

    /// 预估费用（美元）
    fn estimate_cost(&self, text: &str) -> f64;

    /// 通知当前生效的音质档位
    ///
    /// 同一实例注册在多个档位下时，据此选择合成模型
    fn select_quality(&self, _tier: QualityTier) {}

    /// 用于日志的名称
    fn name(&self) -> &str;
}
