//! TTS Context - Value Objects

use serde::{Deserialize, Serialize};

use super::TtsDomainError;

/// 音质档位
///
/// 保真度与费用逐级递增:
/// - Basic: 本地/系统 TTS，免费
/// - Standard / Hd: 远程付费 TTS，仅合成模型不同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Basic,
    Standard,
    #[default]
    Hd,
}

impl QualityTier {
    /// 所有档位（按保真度升序）
    pub const ALL: [QualityTier; 3] = [QualityTier::Basic, QualityTier::Standard, QualityTier::Hd];

    /// 请求的档位未注册时的回退搜索顺序（固定起点，不随请求档位变化）
    pub const FALLBACK_ORDER: [QualityTier; 3] =
        [QualityTier::Hd, QualityTier::Standard, QualityTier::Basic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Hd => "hd",
        }
    }

    /// 是否为付费档位
    pub fn is_paid(&self) -> bool {
        !matches!(self, Self::Basic)
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Standard => 1,
            Self::Hd => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Basic,
            1 => Self::Standard,
            _ => Self::Hd,
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QualityTier {
    type Err = TtsDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "standard" => Ok(Self::Standard),
            "hd" => Ok(Self::Hd),
            _ => Err(TtsDomainError::UnknownQuality(s.to_string())),
        }
    }
}

/// 音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Opus,
        AudioFormat::Aac,
        AudioFormat::Flac,
        AudioFormat::Wav,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "opus" => Some(Self::Opus),
            "aac" => Some(Self::Aac),
            "flac" => Some(Self::Flac),
            "wav" => Some(Self::Wav),
            _ => None,
        }
    }

    /// 文件扩展名，同时也是远程 API 的 `response_format` 取值
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = TtsDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| TtsDomainError::UnknownFormat(s.to_string()))
    }
}

/// 远程 TTS 内置音色
///
/// 音色以字符串形式传给远程 API；这里只列出已知取值，未知名称原样透传
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechVoice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl SpeechVoice {
    pub const ALL: [SpeechVoice; 6] = [
        SpeechVoice::Alloy,
        SpeechVoice::Echo,
        SpeechVoice::Fable,
        SpeechVoice::Onyx,
        SpeechVoice::Nova,
        SpeechVoice::Shimmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Alloy => "balanced, neutral",
            Self::Echo => "clear, professional",
            Self::Fable => "warm, engaging",
            Self::Onyx => "deep, authoritative",
            Self::Nova => "bright, energetic",
            Self::Shimmer => "soft, pleasant",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for SpeechVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 远程合成模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisModel {
    Standard,
    Hd,
}

impl SynthesisModel {
    /// 当且仅当档位为 Hd 时使用 HD 模型
    pub fn for_quality(tier: QualityTier) -> Self {
        match tier {
            QualityTier::Hd => Self::Hd,
            _ => Self::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "tts-1",
            Self::Hd => "tts-1-hd",
        }
    }
}

impl std::fmt::Display for SynthesisModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
