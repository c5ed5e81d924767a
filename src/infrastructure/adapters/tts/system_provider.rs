//! System TTS Provider - 免费的本地/系统语音
//!
//! 本地引擎可用时直接使用，否则调用系统语音命令。始终可用，费用为 0。

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{LocalSpeechEnginePort, TtsProviderPort};

/// 免费档位的提供方
///
/// 内置装配（`build_tts_service`）只接入系统语音命令；`engine` 供嵌入方注入
/// 自己的本地语音引擎，本 crate 不附带本地引擎实现
pub struct SystemTtsProvider {
    /// 可选的本地语音引擎
    engine: Option<Arc<dyn LocalSpeechEnginePort>>,
    /// 系统语音命令
    command: Arc<dyn LocalSpeechEnginePort>,
}

impl SystemTtsProvider {
    pub fn new(
        engine: Option<Arc<dyn LocalSpeechEnginePort>>,
        command: Arc<dyn LocalSpeechEnginePort>,
    ) -> Self {
        match &engine {
            Some(engine) => tracing::info!(
                engine = engine.name(),
                "System TTS provider initialized with local engine"
            ),
            None => tracing::info!(
                command = command.name(),
                "System TTS provider initialized with speech command fallback"
            ),
        }

        Self { engine, command }
    }

    /// 只使用系统语音命令
    pub fn with_command(command: Arc<dyn LocalSpeechEnginePort>) -> Self {
        Self::new(None, command)
    }
}

#[async_trait]
impl TtsProviderPort for SystemTtsProvider {
    async fn speak(&self, text: &str, _voice: Option<&str>) -> bool {
        if text.trim().is_empty() {
            return true;
        }

        let backend = self.engine.as_ref().unwrap_or(&self.command);
        match backend.say(text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(backend = backend.name(), error = %e, "System TTS failed");
                false
            }
        }
    }

    fn is_available(&self) -> bool {
        true
    }

    fn estimate_cost(&self, _text: &str) -> f64 {
        0.0
    }

    fn name(&self) -> &str {
        "system"
    }
}
