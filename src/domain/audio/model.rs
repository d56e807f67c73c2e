use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Ogg => "audio/ogg",
        }
    }

    /// Assumed bitrate in bits per second when the caller gives none
    pub fn default_bitrate(&self) -> u32 {
        match self {
            AudioFormat::Mp3 => 128_000,
            // 24 kHz, 16-bit, mono PCM
            AudioFormat::Wav => 24_000 * 16,
            AudioFormat::Ogg => 96_000,
        }
    }

    pub fn default_sample_rate(&self) -> u32 {
        match self {
            AudioFormat::Mp3 | AudioFormat::Wav => 24_000,
            AudioFormat::Ogg => 48_000,
        }
    }

    pub fn byte_rate(&self) -> f64 {
        self.default_bitrate() as f64 / 8.0
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Facts the caller already knows about a buffer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataHints {
    pub duration_seconds: Option<f64>,
    pub sample_rate: Option<u32>,
    pub bitrate: Option<u32>,
    pub channels: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioMetadata {
    pub duration_seconds: f64,
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub bitrate: u32,
    pub size_bytes: usize,
    pub channels: u16,
}

#[derive(Debug, Clone)]
pub struct ProcessedAudio {
    pub audio_data: Vec<u8>,
    pub metadata: AudioMetadata,
}

#[derive(Debug, Clone)]
pub struct AudioProcessorConfig {
    pub max_size_bytes: usize,
    pub target_duration_seconds: f64,
    pub tolerance_seconds: f64,
}

impl Default for AudioProcessorConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
            target_duration_seconds: 300.0,
            tolerance_seconds: 30.0,
        }
    }
}
