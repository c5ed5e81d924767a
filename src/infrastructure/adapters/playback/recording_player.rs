//! Recording Audio Player - 不出声的播放器
//!
//! 只记录被要求播放的文件，用于测试和无音频设备的环境

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::application::ports::{AudioPlayerPort, PlaybackError};

#[derive(Debug, Default)]
pub struct RecordingAudioPlayer {
    played: Mutex<Vec<PathBuf>>,
    failing: AtomicBool,
}

impl RecordingAudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次播放都失败的播放器
    pub fn failing() -> Self {
        let player = Self::default();
        player.set_failing(true);
        player
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// 已播放的文件（按调用顺序）
    pub fn played(&self) -> Vec<PathBuf> {
        self.played
            .lock()
            .map(|played| played.clone())
            .unwrap_or_default()
    }

    pub fn play_count(&self) -> usize {
        self.played().len()
    }
}

#[async_trait]
impl AudioPlayerPort for RecordingAudioPlayer {
    async fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlaybackError::PlayerFailed {
                player: "recording".to_string(),
                reason: "configured to fail".to_string(),
            });
        }

        if let Ok(mut played) = self.played.lock() {
            played.push(path.to_path_buf());
        }
        Ok(())
    }
}
