use crate::domain::audio::AudioFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Male => "MALE",
            VoiceGender::Female => "FEMALE",
            VoiceGender::Neutral => "NEUTRAL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "MALE" => Some(VoiceGender::Male),
            "FEMALE" => Some(VoiceGender::Female),
            "NEUTRAL" => Some(VoiceGender::Neutral),
            _ => None,
        }
    }
}

/// Voice used for synthesis, stored with each queued job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    pub language_code: String,
    pub voice_name: String,
    pub gender: VoiceGender,
    pub speaking_rate: f32,
    pub pitch: f32,
    pub volume_gain_db: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            language_code: "en-US".to_string(),
            voice_name: "en-US-Neural2-F".to_string(),
            gender: VoiceGender::Female,
            speaking_rate: 0.95,
            pitch: 0.0,
            volume_gain_db: 0.0,
        }
    }
}

/// Partial voice settings; unset fields keep the defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettingsOverride {
    pub language_code: Option<String>,
    pub voice_name: Option<String>,
    pub gender: Option<VoiceGender>,
    pub speaking_rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume_gain_db: Option<f32>,
}

impl VoiceSettings {
    pub fn merged(overrides: Option<&VoiceSettingsOverride>) -> Self {
        let mut settings = Self::default();
        if let Some(o) = overrides {
            settings.apply(o);
        }
        settings
    }

    pub fn apply(&mut self, o: &VoiceSettingsOverride) {
        if let Some(language_code) = &o.language_code {
            self.language_code = language_code.clone();
        }
        if let Some(voice_name) = &o.voice_name {
            self.voice_name = voice_name.clone();
        }
        if let Some(gender) = o.gender {
            self.gender = gender;
        }
        if let Some(rate) = o.speaking_rate {
            self.speaking_rate = rate;
        }
        if let Some(pitch) = o.pitch {
            self.pitch = pitch;
        }
        if let Some(gain) = o.volume_gain_db {
            self.volume_gain_db = gain;
        }
    }

    /// Resolve a profile's stored voice JSON; unreadable JSON falls back to defaults
    pub fn from_profile_json(value: Option<&serde_json::Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };

        match serde_json::from_value::<VoiceSettingsOverride>(value.clone()) {
            Ok(overrides) => Self::merged(Some(&overrides)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable voice settings");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudioEncoding {
    #[default]
    Mp3,
    Linear16,
    OggOpus,
}

impl AudioEncoding {
    /// Provider-facing name (Google's enum spelling)
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::OggOpus => "OGG_OPUS",
        }
    }

    pub fn format(&self) -> AudioFormat {
        match self {
            AudioEncoding::Mp3 => AudioFormat::Mp3,
            AudioEncoding::Linear16 => AudioFormat::Wav,
            AudioEncoding::OggOpus => AudioFormat::Ogg,
        }
    }
}

/// Text handed to a provider
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisInput {
    Text(String),
    Ssml(String),
}

impl SynthesisInput {
    pub fn as_str(&self) -> &str {
        match self {
            SynthesisInput::Text(text) | SynthesisInput::Ssml(text) => text,
        }
    }

    pub fn is_ssml(&self) -> bool {
        matches!(self, SynthesisInput::Ssml(_))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoiceQuality {
    Neural,
    Wavenet,
    Standard,
}

impl VoiceQuality {
    /// Classify a voice by its name; a naming heuristic, not provider metadata
    pub fn from_voice_name(name: &str) -> Self {
        if name.contains("Neural") {
            VoiceQuality::Neural
        } else if name.contains("Wavenet") {
            VoiceQuality::Wavenet
        } else {
            VoiceQuality::Standard
        }
    }
}

/// Voice as reported by a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderVoice {
    pub name: String,
    pub language_codes: Vec<String>,
    pub gender: Option<VoiceGender>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub name: String,
    pub language_codes: Vec<String>,
    pub gender: Option<VoiceGender>,
    pub quality: VoiceQuality,
}

impl From<ProviderVoice> for Voice {
    fn from(v: ProviderVoice) -> Self {
        Self {
            quality: VoiceQuality::from_voice_name(&v.name),
            name: v.name,
            language_codes: v.language_codes,
            gender: v.gender,
        }
    }
}
