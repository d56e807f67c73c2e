use async_trait::async_trait;
use powerpulse_backend::domain::tts::{
    AudioEncoding, ProviderVoice, SynthesisInput, VoiceGender, VoiceSettings,
};
use powerpulse_backend::infrastructure::repositories::{LlmRepository, LlmRequest, TtsRepository};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Constant mp3 bitrate the fake reports, matching Google's
pub const FAKE_MP3_BITRATE: u32 = 32_000;

/// Five minutes of mp3 at the fake's bitrate
pub const FIVE_MINUTES_MP3: usize = (FAKE_MP3_BITRATE as usize / 8) * 300;

/// Scripts containing this marker fail synthesis
pub const FAIL_MARKER: &str = "FAIL";

/// Answers every prompt with a 775-word script
pub struct FakeLlm;

#[async_trait]
impl LlmRepository for FakeLlm {
    async fn complete_json(&self, _request: &LlmRequest<'_>) -> Result<String, String> {
        Ok(serde_json::json!({
            "title": "One Small Win",
            "script": vec!["momentum"; 775].join(" "),
            "keyPoints": ["Start before you feel ready", "Count the small wins"],
            "tone": "motivational",
        })
        .to_string())
    }

    fn provider(&self) -> &'static str {
        "fake-llm"
    }
}

#[derive(Default)]
pub struct FakeTts {
    pub calls: AtomicUsize,
}

impl FakeTts {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsRepository for FakeTts {
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        _voice: &VoiceSettings,
        _encoding: AudioEncoding,
    ) -> Result<Vec<u8>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if input.as_str().contains(FAIL_MARKER) {
            return Err("voice unavailable".to_string());
        }
        Ok(vec![0xFF; FIVE_MINUTES_MP3])
    }

    async fn list_voices(&self, language_code: &str) -> Result<Vec<ProviderVoice>, String> {
        Ok(vec![
            ProviderVoice {
                name: format!("{}-Neural2-F", language_code),
                language_codes: vec![language_code.to_string()],
                gender: Some(VoiceGender::Female),
            },
            ProviderVoice {
                name: format!("{}-Wavenet-D", language_code),
                language_codes: vec![language_code.to_string()],
                gender: Some(VoiceGender::Male),
            },
            ProviderVoice {
                name: format!("{}-Standard-A", language_code),
                language_codes: vec![language_code.to_string()],
                gender: None,
            },
        ])
    }

    fn output_bitrate(&self, encoding: AudioEncoding) -> Option<u32> {
        match encoding {
            AudioEncoding::Mp3 => Some(FAKE_MP3_BITRATE),
            _ => None,
        }
    }

    fn provider(&self) -> &'static str {
        "fake-tts"
    }
}
