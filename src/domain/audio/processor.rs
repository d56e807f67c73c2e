use super::error::ValidationError;
use super::model::{
    AudioFormat, AudioMetadata, AudioProcessorConfig, MetadataHints, ProcessedAudio,
};
use std::io::Cursor;

/// Validates synthesized audio before it is stored
#[derive(Debug, Clone, Default)]
pub struct AudioProcessor {
    config: AudioProcessorConfig,
}

/// Stream properties read from a real container header
struct ParsedHeader {
    duration_seconds: f64,
    sample_rate: u32,
    channels: u16,
    bitrate: u32,
}

impl AudioProcessor {
    pub fn new(config: AudioProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AudioProcessorConfig {
        &self.config
    }

    /// Validate a buffer and attach its metadata.
    ///
    /// Checks run in order: empty, size limit, duration window. Duration
    /// comes from a declared duration first, then the WAV header, then size
    /// divided by the declared bitrate or, failing that, the format's
    /// assumed one.
    pub fn process_audio(
        &self,
        buffer: Vec<u8>,
        format: AudioFormat,
        hints: Option<&MetadataHints>,
    ) -> Result<ProcessedAudio, ValidationError> {
        if buffer.is_empty() {
            return Err(ValidationError::Empty);
        }

        if buffer.len() > self.config.max_size_bytes {
            return Err(ValidationError::TooLarge {
                size: buffer.len(),
                max: self.config.max_size_bytes,
            });
        }

        let hints = hints.cloned().unwrap_or_default();
        let header = match format {
            AudioFormat::Wav => parse_wav_header(&buffer),
            AudioFormat::Mp3 | AudioFormat::Ogg => None,
        };

        let duration_seconds = hints
            .duration_seconds
            .or_else(|| header.as_ref().map(|h| h.duration_seconds))
            .or_else(|| {
                hints
                    .bitrate
                    .filter(|bitrate| *bitrate > 0)
                    .map(|bitrate| buffer.len() as f64 * 8.0 / bitrate as f64)
            })
            .unwrap_or_else(|| buffer.len() as f64 / format.byte_rate());

        let min = self.config.target_duration_seconds - self.config.tolerance_seconds;
        let max = self.config.target_duration_seconds + self.config.tolerance_seconds;
        if !(min..=max).contains(&duration_seconds) {
            return Err(ValidationError::DurationOutOfRange {
                duration: duration_seconds,
                min,
                max,
            });
        }

        let metadata = AudioMetadata {
            duration_seconds,
            format,
            sample_rate: hints
                .sample_rate
                .or_else(|| header.as_ref().map(|h| h.sample_rate))
                .unwrap_or_else(|| format.default_sample_rate()),
            bitrate: hints
                .bitrate
                .or_else(|| header.as_ref().map(|h| h.bitrate))
                .unwrap_or_else(|| format.default_bitrate()),
            size_bytes: buffer.len(),
            channels: hints
                .channels
                .or_else(|| header.as_ref().map(|h| h.channels))
                .unwrap_or(1),
        };

        tracing::debug!(
            format = %format,
            size_bytes = metadata.size_bytes,
            duration_seconds = metadata.duration_seconds,
            "Audio validated"
        );

        Ok(ProcessedAudio {
            audio_data: buffer,
            metadata,
        })
    }
}

fn parse_wav_header(buffer: &[u8]) -> Option<ParsedHeader> {
    let reader = hound::WavReader::new(Cursor::new(buffer)).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }

    Some(ParsedHeader {
        duration_seconds: reader.duration() as f64 / spec.sample_rate as f64,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bitrate: spec.sample_rate * spec.bits_per_sample as u32 * spec.channels as u32,
    })
}
