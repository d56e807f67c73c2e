use crate::domain::tts::{AudioEncoding, ProviderVoice, SynthesisInput, VoiceSettings};
use async_trait::async_trait;
use regex::Regex;
use std::io::Cursor;
use std::sync::LazyLock;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Google Cloud TTS, AWS Polly)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Merging audio chunks into a single audio stream
/// - Mapping voice settings onto provider voices
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text or SSML with the given voice
    ///
    /// # Errors
    /// Returns error text if synthesis fails or the provider is unavailable
    async fn synthesize(
        &self,
        input: &SynthesisInput,
        voice: &VoiceSettings,
        encoding: AudioEncoding,
    ) -> Result<Vec<u8>, String>;

    /// Voices the provider offers for a BCP-47 language code
    async fn list_voices(&self, language_code: &str) -> Result<Vec<ProviderVoice>, String>;

    /// Constant bitrate the provider encodes `encoding` at, in bits per second
    ///
    /// `None` when the stream is self-describing (WAV) or variable.
    fn output_bitrate(&self, _encoding: AudioEncoding) -> Option<u32> {
        None
    }

    fn provider(&self) -> &'static str;
}

// Sentence end, optionally followed by an SSML break
static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+(?:<break[^>]*/>\s*|\s+)"#).expect("valid sentence boundary pattern")
});

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_batch_size` bytes unless a single run of text
/// without punctuation is longer, in which case it is cut on byte length.
pub fn split_into_batches(text: &str, max_batch_size: usize) -> Vec<String> {
    if text.len() <= max_batch_size {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    let mut sentences: Vec<&str> = SENTENCE_BOUNDARY
        .find_iter(text)
        .map(|mat| {
            let sentence = &text[last_end..mat.end()];
            last_end = mat.end();
            sentence
        })
        .collect();
    if last_end < text.len() {
        sentences.push(&text[last_end..]);
    }

    for sentence in sentences {
        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if sentence.len() > max_batch_size {
            batches.extend(hard_split(sentence, max_batch_size));
        } else {
            current_batch.push_str(sentence);
        }
    }

    if !current_batch.trim().is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches
}

/// Cut text into pieces of at most `max_bytes` bytes.
///
/// Cuts land on char boundaries and never inside an SSML tag. A single
/// char or tag longer than the limit is kept whole.
fn hard_split(text: &str, max_bytes: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let rest = &text[start..];
        if rest.len() <= max_bytes {
            pieces.push(rest.to_string());
            break;
        }

        let mut end = start + max_bytes;
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        // back off to before a tag the cut would open
        if let Some(open) = text[start..end].rfind('<').map(|i| start + i) {
            if !text[open..end].contains('>') {
                end = if open > start {
                    open
                } else {
                    text[open..].find('>').map_or(text.len(), |close| open + close + 1)
                };
            }
        }

        if end == start {
            end = start + rest.chars().next().map_or(1, char::len_utf8);
        }

        pieces.push(text[start..end].to_string());
        start = end;
    }

    pieces
}

/// Split a synthesis input, re-wrapping each SSML batch in `<speak>`
pub fn split_input(input: &SynthesisInput, max_batch_size: usize) -> Vec<SynthesisInput> {
    match input {
        SynthesisInput::Text(text) => split_into_batches(text, max_batch_size)
            .into_iter()
            .map(SynthesisInput::Text)
            .collect(),
        SynthesisInput::Ssml(ssml) => {
            if ssml.len() <= max_batch_size {
                return vec![input.clone()];
            }
            let inner = ssml
                .trim()
                .trim_start_matches("<speak>")
                .trim_end_matches("</speak>");
            // room for the wrapper
            let budget = max_batch_size.saturating_sub("<speak></speak>".len()).max(1);
            split_into_batches(inner, budget)
                .into_iter()
                .map(|batch| SynthesisInput::Ssml(format!("<speak>{}</speak>", batch)))
                .collect()
        }
    }
}

/// Join per-batch audio into one stream.
///
/// MP3 frames and Ogg pages concatenate; WAV chunks each carry a RIFF
/// header, so their samples are re-written under a single header.
pub fn merge_audio_chunks(chunks: Vec<Vec<u8>>, encoding: AudioEncoding) -> Result<Vec<u8>, String> {
    if chunks.len() == 1 {
        return Ok(chunks.into_iter().next().unwrap_or_default());
    }

    match encoding {
        AudioEncoding::Mp3 | AudioEncoding::OggOpus => Ok(chunks.concat()),
        AudioEncoding::Linear16 => merge_wav_chunks(&chunks),
    }
}

fn merge_wav_chunks(chunks: &[Vec<u8>]) -> Result<Vec<u8>, String> {
    let Some(first) = chunks.first() else {
        return Ok(Vec::new());
    };
    let spec = hound::WavReader::new(Cursor::new(first.as_slice()))
        .map_err(|e| format!("Invalid WAV chunk 0: {}", e))?
        .spec();

    let mut output = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut output, spec)
            .map_err(|e| format!("Failed to start WAV output: {}", e))?;

        for (index, chunk) in chunks.iter().enumerate() {
            let mut reader = hound::WavReader::new(Cursor::new(chunk.as_slice()))
                .map_err(|e| format!("Invalid WAV chunk {}: {}", index, e))?;

            for sample in reader.samples::<i16>() {
                let sample = sample.map_err(|e| format!("Invalid WAV sample: {}", e))?;
                writer
                    .write_sample(sample)
                    .map_err(|e| format!("Failed to write WAV sample: {}", e))?;
            }
        }

        writer
            .finalize()
            .map_err(|e| format!("Failed to finalize WAV output: {}", e))?;
    }

    Ok(output.into_inner())
}
