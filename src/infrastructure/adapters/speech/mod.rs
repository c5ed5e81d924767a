//! Speech Adapter - 系统语音命令

mod system_speech;

pub use system_speech::{SystemSpeechCommand, SystemSpeechConfig};
