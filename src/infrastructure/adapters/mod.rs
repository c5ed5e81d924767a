//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod playback;
pub mod speech;
pub mod tts;

mod platform;

pub use platform::Platform;
pub use playback::*;
pub use speech::*;
pub use tts::*;
