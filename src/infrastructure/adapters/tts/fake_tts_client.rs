//! Fake TTS Client - 用于测试的合成客户端
//!
//! 不调用任何外部服务，始终返回固定音频，并记录调用次数与最近一次请求

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{SpeechSynthesisPort, SynthesisRequest, TtsError};

/// Fake TTS Client
pub struct FakeTtsClient {
    /// 固定返回的音频数据
    audio_data: Vec<u8>,
    failing: AtomicBool,
    calls: AtomicUsize,
    last_request: Mutex<Option<SynthesisRequest>>,
}

impl FakeTtsClient {
    pub fn new(audio_data: impl Into<Vec<u8>>) -> Self {
        Self {
            audio_data: audio_data.into(),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// 从音频文件加载固定返回内容
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let audio_data = std::fs::read(path.as_ref())?;
        tracing::info!(
            path = %path.as_ref().display(),
            size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self::new(audio_data))
    }

    /// 每次调用都返回服务错误
    pub fn failing() -> Self {
        let client = Self::new(Vec::new());
        client.set_failing(true);
        client
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SynthesisRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(
            model = %request.model,
            voice = %request.voice,
            text_len = request.input.len(),
            "FakeTtsClient: returning fixed audio"
        );

        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request);
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(TtsError::ServiceError("HTTP 429: quota exceeded".to_string()));
        }

        Ok(self.audio_data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AudioFormat, SynthesisModel};

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            model: SynthesisModel::Hd,
            voice: "nova".to_string(),
            input: text.to_string(),
            format: AudioFormat::Mp3,
            speed: 1.0,
        }
    }

    #[tokio::test]
    async fn test_from_file_returns_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.mp3");
        std::fs::write(&path, b"ID3 fake audio").unwrap();

        let client = FakeTtsClient::from_file(&path).unwrap();
        let audio = client.synthesize(request("Hello")).await.unwrap();
        assert_eq!(audio, b"ID3 fake audio".to_vec());
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.last_request().unwrap().input, "Hello");
    }

    #[test]
    fn test_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FakeTtsClient::from_file(dir.path().join("missing.mp3")).is_err());
    }

    #[tokio::test]
    async fn test_failing_toggle() {
        let client = FakeTtsClient::failing();
        assert!(matches!(
            client.synthesize(request("a")).await,
            Err(TtsError::ServiceError(_))
        ));

        client.set_failing(false);
        assert!(client.synthesize(request("b")).await.is_ok());
        assert_eq!(client.call_count(), 2);
    }
}
