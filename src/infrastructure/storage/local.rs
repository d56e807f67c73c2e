use super::AudioStorage;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Writes audio under a directory on disk; meant for development
pub struct LocalAudioStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalAudioStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, String> {
        let relative = Path::new(key);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !is_plain {
            return Err(format!("Invalid storage key: {}", key));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AudioStorage for LocalAudioStorage {
    async fn store_audio(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, String> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }

        let size = data.len();
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

        tracing::debug!(path = %path.display(), size_bytes = size, "Audio written to disk");
        Ok(format!("{}/{}", self.base_url, key))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
