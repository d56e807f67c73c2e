use super::backoff::BackoffPolicy;
use super::error::QueueServiceError;
use super::model::{AudioJob, BatchSummary, NewAudioJob, QueueStats};
use super::AudioQueueRepository;
use crate::domain::audio::{AudioMetadata, AudioProcessor};
use crate::domain::content::{DailyContentRepository, MissingAudioItem};
use crate::domain::tts::{
    enhance_script_with_ssml, AudioEncoding, SsmlOptions, SynthesisOptions, TtsServiceApi,
    VoiceSettings,
};
use crate::infrastructure::storage::AudioStorage;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub batch_size: usize,
    pub concurrency: usize,
    pub max_retries: i32,
    /// How long a claimed job stays invisible to other workers
    pub lease: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            concurrency: 3,
            max_retries: 3,
            lease: Duration::minutes(10),
            backoff: BackoffPolicy::default(),
        }
    }
}

/// Clears its flag on drop so a panicking sweep cannot wedge the runner
struct SweepGuard<'a>(&'a AtomicBool);

impl<'a> SweepGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum JobOutcome {
    Completed,
    /// Content already had audio
    Skipped,
}

struct StoredAudio {
    url: String,
    metadata: AudioMetadata,
}

pub struct QueueService {
    queue_repo: Arc<dyn AudioQueueRepository>,
    content_repo: Arc<dyn DailyContentRepository>,
    tts_service: Arc<dyn TtsServiceApi>,
    audio_processor: AudioProcessor,
    storage: Arc<dyn AudioStorage>,
    config: QueueConfig,
    processing: AtomicBool,
    sweeping_missing: AtomicBool,
}

impl QueueService {
    pub fn new(
        queue_repo: Arc<dyn AudioQueueRepository>,
        content_repo: Arc<dyn DailyContentRepository>,
        tts_service: Arc<dyn TtsServiceApi>,
        audio_processor: AudioProcessor,
        storage: Arc<dyn AudioStorage>,
        config: QueueConfig,
    ) -> Self {
        Self {
            queue_repo,
            content_repo,
            tts_service,
            audio_processor,
            storage,
            config,
            processing: AtomicBool::new(false),
            sweeping_missing: AtomicBool::new(false),
        }
    }
}

#[async_trait]
pub trait QueueServiceApi: Send + Sync {
    /// Claim and run one batch of due jobs
    ///
    /// Returns all-zero counts without touching the queue when another
    /// batch is already running in this process.
    async fn process_pending_jobs(&self) -> Result<BatchSummary, QueueServiceError>;

    /// Produce audio for content rows of `date` (today when `None`) that
    /// have none. Failures become failed queue jobs.
    async fn generate_missing_audio(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<BatchSummary, QueueServiceError>;

    async fn enqueue(&self, job: NewAudioJob) -> Result<AudioJob, QueueServiceError>;

    /// Delete completed jobs processed more than `older_than_days` ago
    async fn cleanup_old_jobs(&self, older_than_days: i64) -> Result<u64, QueueServiceError>;

    /// Reset failed jobs still within the retry limit to pending
    async fn retry_failed_jobs(&self) -> Result<u64, QueueServiceError>;

    async fn queue_stats(&self) -> Result<QueueStats, QueueServiceError>;
}

#[async_trait]
impl QueueServiceApi for QueueService {
    async fn process_pending_jobs(&self) -> Result<BatchSummary, QueueServiceError> {
        let Some(_guard) = SweepGuard::acquire(&self.processing) else {
            tracing::info!("Audio queue already being processed, skipping run");
            return Ok(BatchSummary::default());
        };

        let start_time = std::time::Instant::now();
        let jobs = self
            .queue_repo
            .claim_due(
                self.config.batch_size as i64,
                self.config.max_retries,
                self.config.lease,
            )
            .await?;

        tracing::info!(claimed = jobs.len(), "Claimed audio jobs");

        let mut summary = BatchSummary::default();
        for window in jobs.chunks(self.config.concurrency.max(1)) {
            let outcomes = join_all(window.iter().map(|job| self.process_job(job))).await;

            for (job, outcome) in window.iter().zip(outcomes) {
                match outcome {
                    Ok(JobOutcome::Completed) => summary.processed += 1,
                    Ok(JobOutcome::Skipped) => summary.skipped += 1,
                    Err(e) => {
                        summary.failed += 1;
                        self.record_job_failure(job, &e).await;
                    }
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            skipped = summary.skipped,
            latency_ms = start_time.elapsed().as_millis(),
            "Audio queue batch finished"
        );

        Ok(summary)
    }

    async fn generate_missing_audio(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<BatchSummary, QueueServiceError> {
        let Some(_guard) = SweepGuard::acquire(&self.sweeping_missing) else {
            tracing::info!("Missing audio sweep already running, skipping run");
            return Ok(BatchSummary::default());
        };

        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let items = self.content_repo.find_missing_audio(date).await?;

        tracing::info!(date = %date, count = items.len(), "Content rows missing audio");

        let mut summary = BatchSummary::default();
        for window in items.chunks(self.config.concurrency.max(1)) {
            let outcomes =
                join_all(window.iter().map(|item| self.produce_missing_audio(item))).await;

            for (item, outcome) in window.iter().zip(outcomes) {
                match outcome {
                    Ok(()) => summary.processed += 1,
                    Err(e) => {
                        summary.failed += 1;
                        self.enqueue_failed_item(item, &e).await;
                    }
                }
            }
        }

        Ok(summary)
    }

    async fn enqueue(&self, job: NewAudioJob) -> Result<AudioJob, QueueServiceError> {
        let job = self.queue_repo.enqueue(job).await?;
        tracing::info!(
            job_id = %job.id,
            user_id = %job.user_id,
            scheduled_for = %job.scheduled_for,
            "Audio job enqueued"
        );
        Ok(job)
    }

    async fn cleanup_old_jobs(&self, older_than_days: i64) -> Result<u64, QueueServiceError> {
        let cutoff = Utc::now() - Duration::days(older_than_days.max(0));
        let deleted = self.queue_repo.delete_completed_before(cutoff).await?;
        tracing::info!(deleted = deleted, cutoff = %cutoff, "Old audio jobs cleaned up");
        Ok(deleted)
    }

    async fn retry_failed_jobs(&self) -> Result<u64, QueueServiceError> {
        let reset = self.queue_repo.reset_failed(self.config.max_retries).await?;
        tracing::info!(reset = reset, "Failed audio jobs reset to pending");
        Ok(reset)
    }

    async fn queue_stats(&self) -> Result<QueueStats, QueueServiceError> {
        Ok(self.queue_repo.stats().await?)
    }
}

impl QueueService {
    async fn process_job(&self, job: &AudioJob) -> Result<JobOutcome, QueueServiceError> {
        if let Some(content_id) = job.daily_content_id {
            let existing_url = self
                .content_repo
                .find_by_id(content_id)
                .await?
                .and_then(|content| content.audio_url);

            if let Some(url) = existing_url {
                tracing::info!(job_id = %job.id, content_id = %content_id, "Content already has audio");
                self.queue_repo.complete(job.id, &url).await?;
                return Ok(JobOutcome::Skipped);
            }
        }

        let object_id = job.daily_content_id.unwrap_or(job.id);
        let stored = self
            .produce_audio(job.user_id, object_id, &job.script, &job.voice_settings)
            .await?;

        self.queue_repo.complete(job.id, &stored.url).await?;
        if let Some(content_id) = job.daily_content_id {
            self.attach(content_id, &stored).await?;
        }

        tracing::info!(
            job_id = %job.id,
            user_id = %job.user_id,
            audio_url = %stored.url,
            duration_seconds = stored.metadata.duration_seconds,
            "Audio job completed"
        );

        Ok(JobOutcome::Completed)
    }

    async fn produce_missing_audio(&self, item: &MissingAudioItem) -> Result<(), QueueServiceError> {
        let voice = VoiceSettings::from_profile_json(item.voice_settings.as_ref());
        let stored = self
            .produce_audio(item.user_id, item.content_id, &item.script, &voice)
            .await?;
        self.attach(item.content_id, &stored).await?;

        tracing::info!(
            content_id = %item.content_id,
            user_id = %item.user_id,
            audio_url = %stored.url,
            "Missing audio generated"
        );
        Ok(())
    }

    /// SSML, synthesis, validation and upload for one script
    async fn produce_audio(
        &self,
        user_id: Uuid,
        object_id: Uuid,
        script: &str,
        voice: &VoiceSettings,
    ) -> Result<StoredAudio, QueueServiceError> {
        let ssml = enhance_script_with_ssml(script, &SsmlOptions::default());
        let options = SynthesisOptions {
            ssml: true,
            audio_encoding: AudioEncoding::Mp3,
        };

        let synthesized = self
            .tts_service
            .synthesize_with_voice(&ssml, voice, options)
            .await?;

        let hints = synthesized.metadata_hints();
        let processed = self.audio_processor.process_audio(
            synthesized.audio_data,
            synthesized.format,
            Some(&hints),
        )?;

        let format = processed.metadata.format;
        let key = format!("audio/{}/{}.{}", user_id, object_id, format.as_str());
        let url = self
            .storage
            .store_audio(&key, processed.audio_data, format.content_type())
            .await
            .map_err(QueueServiceError::Storage)?;

        Ok(StoredAudio {
            url,
            metadata: processed.metadata,
        })
    }

    async fn attach(&self, content_id: Uuid, stored: &StoredAudio) -> Result<(), QueueServiceError> {
        self.content_repo
            .attach_audio(
                content_id,
                &stored.url,
                stored.metadata.duration_seconds,
                stored.metadata.size_bytes as i64,
            )
            .await?;
        Ok(())
    }

    async fn record_job_failure(&self, job: &AudioJob, error: &QueueServiceError) {
        let attempts = job.attempts + 1;
        let next_attempt_at =
            self.config
                .backoff
                .next_attempt_at(Utc::now(), attempts, &mut rand::thread_rng());

        tracing::warn!(
            job_id = %job.id,
            user_id = %job.user_id,
            attempts = attempts,
            next_attempt_at = %next_attempt_at,
            error = %error,
            "Audio job failed"
        );

        if let Err(e) = self
            .queue_repo
            .fail(job.id, &error.to_string(), next_attempt_at)
            .await
        {
            tracing::error!(job_id = %job.id, error = %e, "Failed to record job failure");
        }
    }

    async fn enqueue_failed_item(&self, item: &MissingAudioItem, error: &QueueServiceError) {
        let next_attempt_at =
            self.config
                .backoff
                .next_attempt_at(Utc::now(), 1, &mut rand::thread_rng());

        tracing::warn!(
            content_id = %item.content_id,
            user_id = %item.user_id,
            error = %error,
            "Missing audio failed, queueing for retry"
        );

        let job = NewAudioJob {
            user_id: item.user_id,
            daily_content_id: Some(item.content_id),
            script: item.script.clone(),
            scheduled_for: Utc::now(),
            voice_settings: VoiceSettings::from_profile_json(item.voice_settings.as_ref()),
        };

        if let Err(e) = self
            .queue_repo
            .insert_failed(job, &error.to_string(), next_attempt_at)
            .await
        {
            tracing::error!(content_id = %item.content_id, error = %e, "Failed to queue retry job");
        }
    }
}
