//! TTS Adapter - 合成客户端与各档位提供方实现

mod fake_tts_client;
mod http_tts_client;
mod remote_provider;
mod system_provider;

pub use fake_tts_client::FakeTtsClient;
pub use http_tts_client::{HttpTtsClient, HttpTtsClientConfig};
pub use remote_provider::{RemoteTtsProvider, RemoteTtsSettings, COST_PER_MILLION_CHARS};
pub use system_provider::SystemTtsProvider;
