use super::tts_repository::{merge_audio_chunks, split_input, TtsRepository};
use crate::domain::tts::{AudioEncoding, ProviderVoice, SynthesisInput, VoiceGender, VoiceSettings};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GOOGLE_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";

/// Google accepts at most 5000 bytes of input per request
const MAX_BATCH_SIZE: usize = 5000;

const EFFECTS_PROFILE: &str = "headphone-class-device";
/// Google encodes MP3 at a fixed 32 kbps
const GOOGLE_MP3_BITRATE: u32 = 32_000;

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    input: RequestInput<'a>,
    voice: RequestVoice<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum RequestInput<'a> {
    Text(&'a str),
    Ssml(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestVoice<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
    speaking_rate: f32,
    pitch: f32,
    volume_gain_db: f32,
    effects_profile_id: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<GoogleVoice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleVoice {
    name: String,
    #[serde(default)]
    language_codes: Vec<String>,
    ssml_gender: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

/// Google Cloud Text-to-Speech implementation of TTS repository
pub struct GoogleTtsRepository {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleTtsRepository {
    pub fn new(api_key: String) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, GOOGLE_TTS_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call_google(
        &self,
        input: &SynthesisInput,
        voice: &VoiceSettings,
        encoding: AudioEncoding,
    ) -> Result<Vec<u8>, String> {
        let request_input = match input {
            SynthesisInput::Text(text) => RequestInput::Text(text),
            SynthesisInput::Ssml(ssml) => RequestInput::Ssml(ssml),
        };

        let body = SynthesizeRequest {
            input: request_input,
            voice: RequestVoice {
                language_code: &voice.language_code,
                name: &voice.voice_name,
                ssml_gender: voice.gender.as_str(),
            },
            audio_config: AudioConfig {
                audio_encoding: encoding.as_str(),
                speaking_rate: voice.speaking_rate,
                pitch: voice.pitch,
                volume_gain_db: voice.volume_gain_db,
                effects_profile_id: [EFFECTS_PROFILE],
            },
        };

        let response = self
            .client
            .post(format!("{}/text:synthesize", self.base_url))
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = %voice.voice_name, "Google TTS request failed");
                format!("Google TTS request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::error!(
                status = status.as_u16(),
                error = %message,
                voice = %voice.voice_name,
                "Google TTS returned an error"
            );
            return Err(format!("Google TTS error ({}): {}", status.as_u16(), message));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid Google TTS response: {}", e))?;

        match payload.audio_content {
            Some(content) if !content.is_empty() => base64::engine::general_purpose::STANDARD
                .decode(content)
                .map_err(|e| format!("Invalid base64 audio from Google TTS: {}", e)),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        voice: &VoiceSettings,
        encoding: AudioEncoding,
    ) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let batches = split_input(input, MAX_BATCH_SIZE);

        let mut chunks = Vec::with_capacity(batches.len());
        for (index, batch) in batches.iter().enumerate() {
            tracing::debug!(batch_index = index, batch_size = batch.as_str().len(), "Synthesizing batch");
            chunks.push(self.call_google(batch, voice, encoding).await?);
        }

        let audio_data = merge_audio_chunks(chunks, encoding)?;
        let duration = start_time.elapsed();

        tracing::info!(
            provider = "google",
            latency_ms = duration.as_millis(),
            characters_count = input.as_str().len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }

    async fn list_voices(&self, language_code: &str) -> Result<Vec<ProviderVoice>, String> {
        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .query(&[("languageCode", language_code), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| format!("Google TTS voices request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("Google TTS voices error ({}): {}", status.as_u16(), text));
        }

        let payload: VoicesResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid Google voices response: {}", e))?;

        Ok(payload
            .voices
            .into_iter()
            .map(|v| ProviderVoice {
                gender: v.ssml_gender.as_deref().and_then(VoiceGender::parse),
                name: v.name,
                language_codes: v.language_codes,
            })
            .collect())
    }

    fn output_bitrate(&self, encoding: AudioEncoding) -> Option<u32> {
        match encoding {
            AudioEncoding::Mp3 => Some(GOOGLE_MP3_BITRATE),
            AudioEncoding::Linear16 | AudioEncoding::OggOpus => None,
        }
    }

    fn provider(&self) -> &'static str {
        "google"
    }
}
