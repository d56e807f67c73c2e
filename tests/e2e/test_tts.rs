use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_voices_with_quality(ctx: &TestContext) {
    let response = ctx.client.get("/api/tts/voices?language=en-GB").await.unwrap();

    response.assert_status(StatusCode::OK);

    let voices = response.body.as_ref().unwrap().as_array().unwrap().clone();
    assert_eq!(voices.len(), 3);
    assert_eq!(voices[0]["name"], "en-GB-Neural2-F");
    assert_eq!(voices[0]["quality"], "neural");
    assert_eq!(voices[1]["quality"], "wavenet");
    assert_eq!(voices[2]["quality"], "standard");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_estimate_spoken_duration(ctx: &TestContext) {
    let text = vec!["word"; 310].join(" ");
    let response = ctx
        .client
        .post("/api/tts/estimate", &json!({ "text": text, "speaking_rate": 1.0 }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.u64_at("/words"), 310);

    let seconds = response.body.as_ref().unwrap()["estimated_seconds"]
        .as_f64()
        .unwrap();
    assert!((seconds - 120.0).abs() < 1e-6);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_estimate_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts/estimate", &json!({ "text": "   " }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");
}
