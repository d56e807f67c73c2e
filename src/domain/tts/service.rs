use super::error::TtsError;
use super::voice::{AudioEncoding, SynthesisInput, Voice, VoiceSettings, VoiceSettingsOverride};
use crate::domain::audio::{AudioFormat, MetadataHints};
use crate::domain::content::service::WORDS_PER_MINUTE;
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesisOptions {
    /// Treat the text as SSML markup
    pub ssml: bool,
    pub audio_encoding: AudioEncoding,
}

#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio_data: Vec<u8>,
    pub format: AudioFormat,
    pub voice: VoiceSettings,
    /// Provider's constant bitrate for this encoding, when it has one
    pub bitrate: Option<u32>,
}

impl SynthesisResult {
    pub fn metadata_hints(&self) -> MetadataHints {
        MetadataHints {
            bitrate: self.bitrate,
            ..MetadataHints::default()
        }
    }
}

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    voice_cache: Option<Cache<String, Vec<Voice>>>,
}

impl TtsService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, voice_cache_enabled: bool) -> Self {
        // Voice catalogues change rarely; one hour is plenty
        let voice_cache = if voice_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(50)
                    .time_to_live(Duration::from_secs(60 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            tts_repo,
            voice_cache,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text (or SSML) with the default voice merged with `overrides`
    ///
    /// Fails with `TtsError::Invalid` on blank input, `TtsError::Provider`
    /// when the provider call fails and `TtsError::EmptyAudio` when it
    /// returns no bytes.
    async fn synthesize_speech(
        &self,
        text: &str,
        overrides: Option<&VoiceSettingsOverride>,
        options: SynthesisOptions,
    ) -> Result<SynthesisResult, TtsError>;

    /// Synthesize with fully resolved voice settings
    async fn synthesize_with_voice(
        &self,
        text: &str,
        voice: &VoiceSettings,
        options: SynthesisOptions,
    ) -> Result<SynthesisResult, TtsError>;

    /// Voices for a language, classified by quality tier
    async fn list_voices(&self, language_code: &str) -> Result<Vec<Voice>, TtsError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize_speech(
        &self,
        text: &str,
        overrides: Option<&VoiceSettingsOverride>,
        options: SynthesisOptions,
    ) -> Result<SynthesisResult, TtsError> {
        let voice = VoiceSettings::merged(overrides);
        self.synthesize_with_voice(text, &voice, options).await
    }

    async fn synthesize_with_voice(
        &self,
        text: &str,
        voice: &VoiceSettings,
        options: SynthesisOptions,
    ) -> Result<SynthesisResult, TtsError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TtsError::Invalid("text must not be empty".to_string()));
        }

        let input = if options.ssml {
            SynthesisInput::Ssml(text.to_string())
        } else {
            SynthesisInput::Text(text.to_string())
        };

        tracing::info!(
            provider = self.tts_repo.provider(),
            voice = %voice.voice_name,
            language = %voice.language_code,
            encoding = options.audio_encoding.as_str(),
            ssml = options.ssml,
            text_length = text.len(),
            "TTS synthesis request"
        );

        let audio_data = self
            .tts_repo
            .synthesize(&input, voice, options.audio_encoding)
            .await
            .map_err(TtsError::Provider)?;

        if audio_data.is_empty() {
            tracing::error!(
                provider = self.tts_repo.provider(),
                voice = %voice.voice_name,
                "TTS provider returned an empty payload"
            );
            return Err(TtsError::EmptyAudio);
        }

        Ok(SynthesisResult {
            audio_data,
            format: options.audio_encoding.format(),
            voice: voice.clone(),
            bitrate: self.tts_repo.output_bitrate(options.audio_encoding),
        })
    }

    async fn list_voices(&self, language_code: &str) -> Result<Vec<Voice>, TtsError> {
        let language_code = language_code.trim();
        if language_code.is_empty() {
            return Err(TtsError::Invalid("language code is required".to_string()));
        }

        if let Some(cache) = &self.voice_cache {
            if let Some(voices) = cache.get(language_code).await {
                tracing::debug!(language = language_code, "Voice list cache hit");
                return Ok(voices);
            }
        }

        let voices: Vec<Voice> = self
            .tts_repo
            .list_voices(language_code)
            .await
            .map_err(TtsError::Provider)?
            .into_iter()
            .map(Voice::from)
            .collect();

        tracing::info!(
            provider = self.tts_repo.provider(),
            language = language_code,
            voice_count = voices.len(),
            "Voices listed"
        );

        if let Some(cache) = &self.voice_cache {
            cache
                .insert(language_code.to_string(), voices.clone())
                .await;
        }

        Ok(voices)
    }
}

/// Rough spoken length in seconds; for display only
pub fn estimate_duration(text: &str, speaking_rate: f32) -> f64 {
    let words = text.split_whitespace().count() as f64;
    let rate = if speaking_rate > 0.0 {
        speaking_rate as f64
    } else {
        1.0
    };
    words / (WORDS_PER_MINUTE * rate) * 60.0
}
