//! Playback Adapter - 本机音频播放实现

mod recording_player;
mod system_player;

pub use recording_player::RecordingAudioPlayer;
pub use system_player::SystemAudioPlayer;
