pub mod error;
pub mod model;
pub mod processor;

pub use error::ValidationError;
pub use model::{AudioFormat, AudioMetadata, AudioProcessorConfig, MetadataHints, ProcessedAudio};
pub use processor::AudioProcessor;
