use super::AudioStorage;
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use std::sync::Arc;

pub struct S3AudioStorage {
    s3_client: Arc<S3Client>,
    bucket: String,
    public_base_url: String,
}

impl S3AudioStorage {
    /// Objects are served from `public_base_url` when set (CDN), else from
    /// the bucket's virtual-hosted endpoint
    pub fn new(s3_client: Arc<S3Client>, bucket: String, public_base_url: Option<String>) -> Self {
        let public_base_url = public_base_url
            .unwrap_or_else(|| format!("https://{}.s3.amazonaws.com", bucket))
            .trim_end_matches('/')
            .to_string();

        Self {
            s3_client,
            bucket,
            public_base_url,
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl AudioStorage for S3AudioStorage {
    async fn store_audio(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, String> {
        let size = data.len();
        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %self.bucket, key = key, "S3 upload failed");
                format!("S3 upload failed: {}", e)
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = key,
            size_bytes = size,
            "Uploaded audio to S3"
        );

        Ok(self.public_url(key))
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
