use super::tts_repository::{merge_audio_chunks, split_input, TtsRepository};
use crate::domain::tts::ssml::escape_xml;
use crate::domain::tts::{AudioEncoding, ProviderVoice, SynthesisInput, VoiceGender, VoiceSettings};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, Gender, LanguageCode, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::io::Cursor;
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// Polly returns headerless 16 kHz PCM for LINEAR16 requests
const PCM_SAMPLE_RATE: u32 = 16_000;
const MP3_SAMPLE_RATE: u32 = 24_000;
/// Polly's MP3 bitrate at 24 kHz
const MP3_BITRATE: u32 = 48_000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Use the configured name when it is a Polly voice, else pick one for
    /// the language and gender
    fn resolve_voice(voice: &VoiceSettings) -> &str {
        if !voice.voice_name.is_empty() && !voice.voice_name.contains('-') {
            return &voice.voice_name;
        }

        let male = voice.gender == VoiceGender::Male;
        match (voice.language_code.as_str(), male) {
            ("en-GB", false) => "Amy",
            ("en-GB", true) => "Brian",
            ("en-AU", false) => "Olivia",
            ("es-ES", false) => "Lucia",
            ("es-ES", true) => "Sergio",
            ("es-US", false) => "Lupe",
            ("es-US", true) => "Pedro",
            ("fr-FR", false) => "Lea",
            ("fr-FR", true) => "Remi",
            ("de-DE", false) => "Vicki",
            ("de-DE", true) => "Daniel",
            ("it-IT", false) => "Bianca",
            ("it-IT", true) => "Adriano",
            ("pt-BR", false) => "Camila",
            ("pt-BR", true) => "Thiago",
            (_, true) => "Matthew",
            (_, false) => "Joanna",
        }
    }

    fn output_format(encoding: AudioEncoding) -> OutputFormat {
        match encoding {
            AudioEncoding::Mp3 => OutputFormat::Mp3,
            AudioEncoding::Linear16 => OutputFormat::Pcm,
            AudioEncoding::OggOpus => OutputFormat::OggVorbis,
        }
    }

    /// Polly has no speaking-rate parameter; express it as SSML prosody
    fn with_prosody(input: &SynthesisInput, speaking_rate: f32) -> SynthesisInput {
        if (speaking_rate - 1.0).abs() < f32::EPSILON {
            return input.clone();
        }

        let percent = (speaking_rate * 100.0).round() as i32;
        let inner = match input {
            SynthesisInput::Text(text) => escape_xml(text),
            SynthesisInput::Ssml(ssml) => ssml
                .trim()
                .trim_start_matches("<speak>")
                .trim_end_matches("</speak>")
                .to_string(),
        };

        SynthesisInput::Ssml(format!(
            "<speak><prosody rate=\"{}%\">{}</prosody></speak>",
            percent, inner
        ))
    }

    /// Call AWS Polly to synthesize a single batch
    async fn call_polly(
        &self,
        input: &SynthesisInput,
        voice_name: &str,
        encoding: AudioEncoding,
    ) -> Result<Vec<u8>, String> {
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Neural;
        let text_type = if input.is_ssml() {
            TextType::Ssml
        } else {
            TextType::Text
        };

        tracing::debug!(
            voice = voice_name,
            engine = ?engine,
            text_type = ?text_type,
            text_length = input.as_str().len(),
            "Calling AWS Polly synthesize_speech"
        );

        let mut request = self
            .polly_client
            .synthesize_speech()
            .text(input.as_str())
            .text_type(text_type)
            .voice_id(voice_id)
            .output_format(Self::output_format(encoding))
            .engine(engine.clone());

        match encoding {
            AudioEncoding::Linear16 => {
                request = request.sample_rate(PCM_SAMPLE_RATE.to_string());
            }
            AudioEncoding::Mp3 => {
                request = request.sample_rate(MP3_SAMPLE_RATE.to_string());
            }
            AudioEncoding::OggOpus => {}
        }

        let result = request.send().await.map_err(|e| {
            tracing::error!(
                error = ?e,
                error_display = %e,
                voice = voice_name,
                engine = ?engine,
                text_length = input.as_str().len(),
                "AWS Polly synthesize_speech failed"
            );
            format!("AWS Polly error: {:?}", e)
        })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        if encoding == AudioEncoding::Linear16 {
            return wrap_pcm_as_wav(&audio_bytes);
        }
        Ok(audio_bytes)
    }
}

/// Put a RIFF header on raw 16-bit mono PCM
fn wrap_pcm_as_wav(pcm: &[u8]) -> Result<Vec<u8>, String> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: PCM_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut output = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut output, spec)
            .map_err(|e| format!("Failed to start WAV output: {}", e))?;
        for pair in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([pair[0], pair[1]]))
                .map_err(|e| format!("Failed to write WAV sample: {}", e))?;
        }
        writer
            .finalize()
            .map_err(|e| format!("Failed to finalize WAV output: {}", e))?;
    }
    Ok(output.into_inner())
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        voice: &VoiceSettings,
        encoding: AudioEncoding,
    ) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_name = Self::resolve_voice(voice);

        let batches = split_input(input, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = input.as_str().len(),
            voice = voice_name,
            "Text split into batches"
        );

        let mut chunks = Vec::with_capacity(batches.len());
        for (index, batch) in batches.iter().enumerate() {
            let batch = Self::with_prosody(batch, voice.speaking_rate);
            chunks.push(self.call_polly(&batch, voice_name, encoding).await?);
            tracing::debug!(batch_index = index, "Batch synthesized");
        }

        let audio_data = merge_audio_chunks(chunks, encoding)?;

        let duration = start_time.elapsed();
        let characters_count = input.as_str().len();
        let throughput_chars_per_sec = if duration.as_secs_f64() > 0.0 {
            characters_count as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            provider = "polly",
            latency_ms = duration.as_millis(),
            characters_count = characters_count,
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            throughput_chars_per_sec = format!("{:.2}", throughput_chars_per_sec),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }

    async fn list_voices(&self, language_code: &str) -> Result<Vec<ProviderVoice>, String> {
        let output = self
            .polly_client
            .describe_voices()
            .language_code(LanguageCode::from(language_code))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, language = language_code, "AWS Polly describe_voices failed");
                format!("AWS Polly error: {:?}", e)
            })?;

        Ok(output
            .voices()
            .iter()
            .filter_map(|v| {
                let name = v.id()?.as_str().to_string();
                let gender = match v.gender() {
                    Some(Gender::Male) => Some(VoiceGender::Male),
                    Some(Gender::Female) => Some(VoiceGender::Female),
                    _ => None,
                };
                let language_codes = v
                    .language_code()
                    .map(|c| vec![c.as_str().to_string()])
                    .unwrap_or_default();
                Some(ProviderVoice {
                    name,
                    language_codes,
                    gender,
                })
            })
            .collect())
    }

    fn output_bitrate(&self, encoding: AudioEncoding) -> Option<u32> {
        match encoding {
            AudioEncoding::Mp3 => Some(MP3_BITRATE),
            AudioEncoding::Linear16 | AudioEncoding::OggOpus => None,
        }
    }

    fn provider(&self) -> &'static str {
        "polly"
    }
}
