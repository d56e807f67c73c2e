pub mod backoff;
pub mod error;
pub mod model;
pub mod service;

pub use backoff::BackoffPolicy;
pub use error::QueueServiceError;
pub use model::{AudioJob, BatchSummary, JobStatus, NewAudioJob, QueueStats};
pub use service::{QueueConfig, QueueService, QueueServiceApi};

use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Durable audio job queue.
///
/// `claim_due` must be atomic across processes: a claimed job is invisible
/// to other claimers until its lease expires.
#[async_trait]
pub trait AudioQueueRepository: Send + Sync {
    async fn enqueue(&self, job: NewAudioJob) -> AppResult<AudioJob>;

    /// Mark up to `limit` due jobs as processing and return them
    async fn claim_due(
        &self,
        limit: i64,
        max_retries: i32,
        lease: Duration,
    ) -> AppResult<Vec<AudioJob>>;

    async fn complete(&self, job_id: Uuid, audio_url: &str) -> AppResult<()>;

    /// Record a failure: attempts + 1, error text and next eligible time
    async fn fail(
        &self,
        job_id: Uuid,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Insert a job that already failed once
    async fn insert_failed(
        &self,
        job: NewAudioJob,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> AppResult<AudioJob>;

    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Reset failed jobs with `attempts <= max_retries` to pending
    async fn reset_failed(&self, max_retries: i32) -> AppResult<u64>;

    async fn stats(&self) -> AppResult<QueueStats>;
}
