//! HTTP TTS Client - 调用 OpenAI 兼容的语音合成接口
//!
//! 实现 SpeechSynthesisPort trait
//!
//! 外部 TTS API:
//! POST {base_url}/audio/speech
//! Request: {"model": "tts-1", "voice": "alloy", "input": "...", "response_format": "mp3", "speed": 1.0}
//! Response: 编码后的音频二进制

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SpeechSynthesisPort, SynthesisRequest, TtsError};

/// 语音合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeechHttpRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
    speed: f32,
}

/// HTTP TTS 客户端配置
#[derive(Clone)]
pub struct HttpTtsClientConfig {
    /// API 凭证
    pub api_key: String,
    /// API 基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl std::fmt::Debug for HttpTtsClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTtsClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HttpTtsClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建客户端；凭证为空视为初始化失败
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        if config.api_key.trim().is_empty() {
            return Err(TtsError::Unauthorized("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL
    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechSynthesisPort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        let body = SpeechHttpRequest {
            model: request.model.as_str(),
            voice: &request.voice,
            input: &request.input,
            response_format: request.format.extension(),
            speed: request.speed,
        };

        tracing::debug!(
            url = %self.speech_url(),
            model = body.model,
            voice = body.voice,
            text_len = body.input.len(),
            "Sending speech synthesis request"
        );

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::Unauthorized(format!("HTTP {}: {}", status, error_text)));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else {
                    TtsError::InvalidResponse(format!("Failed to read audio: {}", e))
                }
            })?
            .to_vec();

        if audio_data.is_empty() {
            return Err(TtsError::InvalidResponse("Empty audio payload".to_string()));
        }

        tracing::info!(
            model = %request.model,
            voice = %request.voice,
            audio_size = audio_data.len(),
            "Speech synthesis completed"
        );

        Ok(audio_data)
    }
}
