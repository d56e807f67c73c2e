pub mod local;
pub mod s3;

pub use local::LocalAudioStorage;
pub use s3::S3AudioStorage;

use async_trait::async_trait;

/// Object storage for finished audio files
#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Write `data` under `key` and return its public URL
    async fn store_audio(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, String>;

    fn backend(&self) -> &'static str;
}
