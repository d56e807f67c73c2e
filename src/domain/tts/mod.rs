pub mod error;
pub mod service;
pub mod ssml;
pub mod voice;

pub use error::TtsError;
pub use service::{estimate_duration, SynthesisOptions, SynthesisResult, TtsService, TtsServiceApi};
pub use ssml::{enhance_script_with_ssml, SsmlOptions};
pub use voice::{
    AudioEncoding, ProviderVoice, SynthesisInput, Voice, VoiceGender, VoiceQuality,
    VoiceSettings, VoiceSettingsOverride,
};
