//! System Audio Player - 调用平台自带的播放器
//!
//! - macOS: afplay
//! - Linux: paplay → aplay → mpg123 → ffplay，依次尝试直到成功
//! - Windows: PowerShell `Media.SoundPlayer.PlaySync`
//! - 其它平台: `PlaybackError::UnsupportedPlatform`

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::application::ports::{AudioPlayerPort, PlaybackError};
use crate::infrastructure::adapters::Platform;

/// 外部播放命令
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlayerCommand {
    program: &'static str,
    /// 放在文件路径之前的参数
    args: &'static [&'static str],
}

const MACOS_PLAYER: PlayerCommand = PlayerCommand {
    program: "afplay",
    args: &[],
};

const LINUX_PLAYERS: &[PlayerCommand] = &[
    PlayerCommand {
        program: "paplay",
        args: &[],
    },
    PlayerCommand {
        program: "aplay",
        args: &["-q"],
    },
    PlayerCommand {
        program: "mpg123",
        args: &["-q"],
    },
    PlayerCommand {
        program: "ffplay",
        args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
    },
];

/// 文件路径通过环境变量传入，避免 PowerShell 转义问题
const WINDOWS_PLAY_SCRIPT: &str =
    "(New-Object Media.SoundPlayer $env:CHIRPY_AUDIO_FILE).PlaySync()";

/// 系统音频播放器
#[derive(Debug, Clone)]
pub struct SystemAudioPlayer {
    platform: Platform,
}

impl SystemAudioPlayer {
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// 执行播放命令并等待结束
    async fn run(command: &PlayerCommand, path: &Path) -> Result<(), PlaybackError> {
        let output = Command::new(command.program)
            .args(command.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PlaybackError::PlayerFailed {
                player: command.program.to_string(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PlaybackError::PlayerFailed {
                player: command.program.to_string(),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }

    async fn play_linux(path: &Path) -> Result<(), PlaybackError> {
        for player in LINUX_PLAYERS {
            match Self::run(player, path).await {
                Ok(()) => {
                    tracing::debug!(player = player.program, "Playback completed");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Audio player unavailable, trying next");
                }
            }
        }

        let tried: Vec<&str> = LINUX_PLAYERS.iter().map(|p| p.program).collect();
        Err(PlaybackError::NoPlayerFound(tried.join(", ")))
    }

    async fn play_windows(path: &Path) -> Result<(), PlaybackError> {
        let output = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", WINDOWS_PLAY_SCRIPT])
            .env("CHIRPY_AUDIO_FILE", path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PlaybackError::PlayerFailed {
                player: "powershell".to_string(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PlaybackError::PlayerFailed {
                player: "powershell".to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Default for SystemAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayerPort for SystemAudioPlayer {
    async fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        if !path.is_file() {
            return Err(PlaybackError::IoError(format!(
                "Audio file not found: {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), platform = %self.platform, "Playing audio file");

        match &self.platform {
            Platform::MacOs => Self::run(&MACOS_PLAYER, path).await,
            Platform::Linux => Self::play_linux(path).await,
            Platform::Windows => Self::play_windows(path).await,
            Platform::Other(name) => Err(PlaybackError::UnsupportedPlatform(name.clone())),
        }
    }
}
