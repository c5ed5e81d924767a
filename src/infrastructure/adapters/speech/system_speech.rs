//! System Speech Command - 操作系统自带的朗读命令
//!
//! 本地语音引擎不可用时的兜底实现：
//! - macOS: `say -r <rate>`
//! - Linux: espeak-ng → espeak → spd-say，依次尝试
//! - Windows: PowerShell `System.Speech`

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{LocalSpeechEnginePort, SpeechEngineError};
use crate::infrastructure::adapters::Platform;

/// 系统语音命令配置
#[derive(Debug, Clone)]
pub struct SystemSpeechConfig {
    /// 语速（词/分钟）
    pub rate: u32,
    /// 音量 (0.0 - 1.0)
    pub volume: f32,
}

impl Default for SystemSpeechConfig {
    fn default() -> Self {
        Self {
            rate: 180,
            volume: 0.9,
        }
    }
}

/// 文本通过环境变量传入，避免 PowerShell 转义问题
const WINDOWS_SPEAK_SCRIPT: &str = "Add-Type -AssemblyName System.Speech; \
    $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
    $s.Rate = [int]$env:CHIRPY_SPEECH_RATE; \
    $s.Volume = [int]$env:CHIRPY_SPEECH_VOLUME; \
    $s.Speak($env:CHIRPY_SPEECH_TEXT)";

/// 系统语音命令
#[derive(Debug, Clone)]
pub struct SystemSpeechCommand {
    platform: Platform,
    config: SystemSpeechConfig,
}

impl SystemSpeechCommand {
    pub fn new(config: SystemSpeechConfig) -> Self {
        Self::for_platform(Platform::current(), config)
    }

    pub fn for_platform(platform: Platform, config: SystemSpeechConfig) -> Self {
        Self { platform, config }
    }

    /// 候选命令（程序名 + 完整参数），按尝试顺序排列
    fn candidates(&self, text: &str) -> Vec<(&'static str, Vec<String>)> {
        let rate = self.config.rate.to_string();
        // espeak 振幅范围 0-200，默认 100
        let amplitude = ((self.config.volume.clamp(0.0, 1.0) * 200.0).round() as u32).to_string();

        match self.platform {
            Platform::MacOs => vec![("say", vec!["-r".into(), rate, text.into()])],
            Platform::Linux => vec![
                (
                    "espeak-ng",
                    vec!["-s".into(), rate.clone(), "-a".into(), amplitude.clone(), text.into()],
                ),
                (
                    "espeak",
                    vec!["-s".into(), rate, "-a".into(), amplitude, text.into()],
                ),
                ("spd-say", vec!["-w".into(), text.into()]),
            ],
            _ => Vec::new(),
        }
    }

    async fn run(program: &str, args: &[String]) -> Result<(), SpeechEngineError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SpeechEngineError::CommandFailed {
                command: program.to_string(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SpeechEngineError::CommandFailed {
                command: program.to_string(),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }

    /// SAPI 语速范围 -10..=10，0 约等于 180 词/分钟
    fn windows_rate(&self) -> i32 {
        ((self.config.rate as i32 - 180) / 20).clamp(-10, 10)
    }

    async fn say_windows(&self, text: &str) -> Result<(), SpeechEngineError> {
        let volume = (self.config.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", WINDOWS_SPEAK_SCRIPT])
            .env("CHIRPY_SPEECH_TEXT", text)
            .env("CHIRPY_SPEECH_RATE", self.windows_rate().to_string())
            .env("CHIRPY_SPEECH_VOLUME", volume.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SpeechEngineError::CommandFailed {
                command: "powershell".to_string(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SpeechEngineError::CommandFailed {
                command: "powershell".to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl LocalSpeechEnginePort for SystemSpeechCommand {
    async fn say(&self, text: &str) -> Result<(), SpeechEngineError> {
        match &self.platform {
            Platform::Windows => return self.say_windows(text).await,
            Platform::Other(name) => {
                return Err(SpeechEngineError::UnsupportedPlatform(name.clone()))
            }
            Platform::MacOs | Platform::Linux => {}
        }

        let mut last_error = None;
        for (program, args) in self.candidates(text) {
            match Self::run(program, &args).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(error = %e, "Speech command unavailable, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SpeechEngineError::Unavailable(format!("no speech command for {}", self.platform))
        }))
    }

    fn name(&self) -> &str {
        "system-command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_uses_say_with_rate() {
        let command = SystemSpeechCommand::for_platform(
            Platform::MacOs,
            SystemSpeechConfig {
                rate: 200,
                volume: 0.5,
            },
        );

        let candidates = command.candidates("Hello");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0, "say");
        assert_eq!(candidates[0].1, vec!["-r", "200", "Hello"]);
    }

    #[test]
    fn test_linux_candidate_order_and_amplitude() {
        let command = SystemSpeechCommand::for_platform(
            Platform::Linux,
            SystemSpeechConfig {
                rate: 180,
                volume: 0.5,
            },
        );

        let candidates = command.candidates("Hi");
        let programs: Vec<&str> = candidates.iter().map(|(p, _)| *p).collect();
        assert_eq!(programs, vec!["espeak-ng", "espeak", "spd-say"]);
        assert_eq!(candidates[0].1, vec!["-s", "180", "-a", "100", "Hi"]);
    }

    #[test]
    fn test_windows_rate_mapping() {
        let fast = SystemSpeechCommand::for_platform(
            Platform::Windows,
            SystemSpeechConfig {
                rate: 500,
                volume: 1.0,
            },
        );
        let normal = SystemSpeechCommand::for_platform(Platform::Windows, SystemSpeechConfig::default());

        assert_eq!(fast.windows_rate(), 10);
        assert_eq!(normal.windows_rate(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_platform() {
        let command = SystemSpeechCommand::for_platform(
            Platform::Other("plan9".to_string()),
            SystemSpeechConfig::default(),
        );

        let result = command.say("Hello").await;
        assert!(matches!(result, Err(SpeechEngineError::UnsupportedPlatform(_))));
    }
}
