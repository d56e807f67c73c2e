use crate::e2e::helpers;

use chrono::{Duration, Utc};
use helpers::{fake_providers::FIVE_MINUTES_MP3, TestContext, AUDIO_BASE_URL, CRON_SECRET};
use hyper::StatusCode;
use powerpulse_backend::domain::{queue::JobStatus, user::SubscriptionStatus};
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_cron_calls_without_the_secret(ctx: &TestContext) {
    let response = ctx.client.get("/api/cron/process-audio").await.unwrap();
    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Missing authorization header");

    let response = ctx
        .client
        .get_with_auth("/api/cron/generate-content", "wrong-secret")
        .await
        .unwrap();
    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Invalid cron secret");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_content_once_per_active_user(ctx: &TestContext) {
    let ana = ctx.fixtures.create_active_user("ana@example.com").await.unwrap();
    ctx.fixtures
        .create_profile(ana.id, &["procrastination"], None)
        .await
        .unwrap();
    ctx.fixtures.create_progress(ana.id, 3, 3, 3).await.unwrap();
    ctx.fixtures
        .create_user("ben@example.com", SubscriptionStatus::Trialing)
        .await
        .unwrap();
    ctx.fixtures
        .create_user("cy@example.com", SubscriptionStatus::Cancelled)
        .await
        .unwrap();

    let response = ctx
        .client
        .get_with_auth("/api/cron/generate-content", CRON_SECRET)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.u64_at("/generated"), 2);
    assert_eq!(response.u64_at("/failed"), 0);
    assert_eq!(response.u64_at("/skipped"), 0);

    let today = Utc::now().date_naive();
    assert_eq!(ctx.fixtures.count_content_on(today).await.unwrap(), 2);

    let response = ctx
        .client
        .get_with_auth("/api/cron/generate-content", CRON_SECRET)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.u64_at("/generated"), 0);
    assert_eq!(response.u64_at("/skipped"), 2);
    assert_eq!(ctx.fixtures.count_content_on(today).await.unwrap(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_turn_generated_content_into_stored_audio(ctx: &TestContext) {
    let ana = ctx.fixtures.create_active_user("ana@example.com").await.unwrap();

    ctx.client
        .get_with_auth("/api/cron/generate-content", CRON_SECRET)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .get_with_auth("/api/cron/process-audio", CRON_SECRET)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.u64_at("/queue/processed"), 1);
    assert_eq!(response.u64_at("/queue/failed"), 0);
    assert_eq!(response.u64_at("/missing_audio/processed"), 0);
    assert_eq!(response.u64_at("/stats/completed"), 1);
    assert_eq!(response.u64_at("/stats/pending"), 0);

    let (content_id, audio_url): (uuid::Uuid, Option<String>) =
        sqlx::query_as("SELECT id, audio_url FROM daily_content WHERE user_id = $1")
            .bind(ana.id)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();

    let expected_key = format!("audio/{}/{}.mp3", ana.id, content_id);
    assert_eq!(
        audio_url,
        Some(format!("{}/{}", AUDIO_BASE_URL, expected_key))
    );
    assert!(ctx.audio_dir.path().join(&expected_key).exists());
    assert_eq!(ctx.tts.calls(), 1);

    // The stored URL resolves on this server
    let response = ctx
        .client
        .get(&format!("/audio/{}", expected_key))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes.len(), FIVE_MINUTES_MP3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_back_off_failed_jobs(ctx: &TestContext) {
    let ana = ctx.fixtures.create_active_user("ana@example.com").await.unwrap();
    let today = Utc::now().date_naive();
    let content_id = ctx
        .fixtures
        .create_content(ana.id, today, "This will FAIL.", None)
        .await
        .unwrap();
    let job_id = ctx
        .fixtures
        .create_job(
            ana.id,
            Some(content_id),
            "This will FAIL.",
            JobStatus::Pending,
            0,
            Utc::now() - Duration::minutes(1),
            None,
        )
        .await
        .unwrap();

    let response = ctx
        .client
        .get_with_auth("/api/cron/process-audio", CRON_SECRET)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.u64_at("/queue/failed"), 1);
    // the failed job still covers this content
    assert_eq!(response.u64_at("/missing_audio/failed"), 0);

    let (status, attempts, _) = ctx.fixtures.job_status(job_id).await.unwrap();
    assert_eq!(status, "failed");
    assert_eq!(attempts, 1);

    // Not eligible again until the backoff elapses
    let response = ctx
        .client
        .get_with_auth("/api/cron/process-audio", CRON_SECRET)
        .await
        .unwrap();
    assert_eq!(response.u64_at("/queue/failed"), 0);
    assert_eq!(response.u64_at("/queue/processed"), 0);
    assert_eq!(ctx.tts.calls(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_sweep_content_missing_audio(ctx: &TestContext) {
    let ana = ctx.fixtures.create_active_user("ana@example.com").await.unwrap();
    let ben = ctx.fixtures.create_active_user("ben@example.com").await.unwrap();
    ctx.fixtures
        .create_profile(
            ana.id,
            &["self-doubt"],
            Some(json!({ "voiceName": "en-US-Neural2-D", "gender": "MALE" })),
        )
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let ok_id = ctx
        .fixtures
        .create_content(ana.id, today, "Breathe in. Begin.", None)
        .await
        .unwrap();
    let failing_id = ctx
        .fixtures
        .create_content(ben.id, today, "Please FAIL now.", None)
        .await
        .unwrap();
    ctx.fixtures
        .create_content(ben.id, today - Duration::days(1), "Yesterday.", None)
        .await
        .unwrap();

    let response = ctx
        .client
        .get_with_auth("/api/cron/process-audio", CRON_SECRET)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.u64_at("/missing_audio/processed"), 1);
    assert_eq!(response.u64_at("/missing_audio/failed"), 1);

    assert!(ctx
        .fixtures
        .content_audio_url(ok_id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(ctx.fixtures.content_audio_url(failing_id).await.unwrap(), None);
    assert_eq!(
        ctx.fixtures.count_jobs_for_content(failing_id).await.unwrap(),
        1
    );

    // The queued retry keeps the sweep from piling up duplicate jobs
    let response = ctx
        .client
        .get_with_auth("/api/cron/process-audio", CRON_SECRET)
        .await
        .unwrap();
    assert_eq!(response.u64_at("/missing_audio/failed"), 0);
    assert_eq!(
        ctx.fixtures.count_jobs_for_content(failing_id).await.unwrap(),
        1
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_retry_failed_and_clean_old_jobs(ctx: &TestContext) {
    let ana = ctx.fixtures.create_active_user("ana@example.com").await.unwrap();
    let past = Utc::now() - Duration::days(30);

    let failed_id = ctx
        .fixtures
        .create_job(ana.id, None, "Retry me.", JobStatus::Failed, 2, past, Some(Utc::now() + Duration::hours(1)))
        .await
        .unwrap();
    let old_id = ctx
        .fixtures
        .create_job(ana.id, None, "Old news.", JobStatus::Completed, 0, past, None)
        .await
        .unwrap();
    let recent_id = ctx
        .fixtures
        .create_job(ana.id, None, "Fresh.", JobStatus::Completed, 0, past, None)
        .await
        .unwrap();

    sqlx::query("UPDATE audio_generation_queue SET processed_at = $2 WHERE id = $1")
        .bind(old_id)
        .bind(Utc::now() - Duration::days(8))
        .execute(&ctx.pool)
        .await
        .unwrap();
    sqlx::query("UPDATE audio_generation_queue SET processed_at = $2 WHERE id = $1")
        .bind(recent_id)
        .bind(Utc::now() - Duration::days(1))
        .execute(&ctx.pool)
        .await
        .unwrap();

    let response = ctx
        .client
        .get_with_auth("/api/cron/maintenance", CRON_SECRET)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.u64_at("/retried"), 1);
    assert_eq!(response.u64_at("/cleaned"), 1);

    let (status, attempts, _) = ctx.fixtures.job_status(failed_id).await.unwrap();
    assert_eq!(status, "pending");
    assert_eq!(attempts, 0);
    assert!(ctx.fixtures.job_status(old_id).await.is_err());
    assert!(ctx.fixtures.job_status(recent_id).await.is_ok());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_regenerate_content_for_a_user(ctx: &TestContext) {
    let ana = ctx.fixtures.create_active_user("ana@example.com").await.unwrap();
    let today = Utc::now().date_naive();
    let original_id = ctx
        .fixtures
        .create_content(ana.id, today, "Original script.", Some("https://cdn/old.mp3"))
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/internal/content/regenerate",
            &json!({ "user_id": ana.id, "negative_feedback": true }),
            CRON_SECRET,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["template_name"], "supportive_recovery");
    assert_eq!(body["word_count"], 775);
    assert!(body["audio_url"].is_null());
    assert_ne!(body["id"], json!(original_id));

    assert_eq!(ctx.fixtures.count_content_on(today).await.unwrap(), 1);
    let new_id: uuid::Uuid = serde_json::from_value(body["id"].clone()).unwrap();
    assert_eq!(ctx.fixtures.count_jobs_for_content(new_id).await.unwrap(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_drop_outstanding_jobs_of_replaced_content(ctx: &TestContext) {
    let ana = ctx.fixtures.create_active_user("ana@example.com").await.unwrap();
    let today = Utc::now().date_naive();
    let original_id = ctx
        .fixtures
        .create_content(ana.id, today, "Original script.", None)
        .await
        .unwrap();
    let due = Utc::now() - Duration::minutes(1);
    let pending_id = ctx
        .fixtures
        .create_job(ana.id, Some(original_id), "Original script.", JobStatus::Pending, 0, due, None)
        .await
        .unwrap();
    let failed_id = ctx
        .fixtures
        .create_job(ana.id, Some(original_id), "Original script.", JobStatus::Failed, 1, due, None)
        .await
        .unwrap();
    let done_id = ctx
        .fixtures
        .create_job(ana.id, Some(original_id), "Original script.", JobStatus::Completed, 0, due, None)
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/internal/content/regenerate",
            &json!({ "user_id": ana.id }),
            CRON_SECRET,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let new_id: uuid::Uuid =
        serde_json::from_value(response.body.as_ref().unwrap()["id"].clone()).unwrap();

    assert!(ctx.fixtures.job_status(pending_id).await.is_err());
    assert!(ctx.fixtures.job_status(failed_id).await.is_err());
    assert!(ctx.fixtures.job_status(done_id).await.is_ok());

    // Only the regenerated script reaches the TTS provider
    let response = ctx
        .client
        .get_with_auth("/api/cron/process-audio", CRON_SECRET)
        .await
        .unwrap();
    assert_eq!(response.u64_at("/queue/processed"), 1);
    assert_eq!(ctx.tts.calls(), 1);
    assert!(ctx.fixtures.content_audio_url(new_id).await.unwrap().is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_when_regenerating_unknown_user(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            "/api/internal/content/regenerate",
            &json!({ "user_id": uuid::Uuid::new_v4() }),
            CRON_SECRET,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}
