use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::infrastructure::config::Config;

/// Guards scheduler-triggered routes with `Authorization: Bearer <CRON_SECRET>`
pub async fn cron_auth_middleware(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

    if config.cron_secret.is_empty() || !secrets_match(token, &config.cron_secret) {
        return Err(AppError::Unauthorized("Invalid cron secret".to_string()));
    }

    Ok(next.run(request).await)
}

/// Length-independent comparison
fn secrets_match(given: &str, expected: &str) -> bool {
    let given = given.as_bytes();
    let expected = expected.as_bytes();
    let mut diff = given.len() ^ expected.len();
    for (i, b) in expected.iter().enumerate() {
        diff |= (*b ^ given.get(i).copied().unwrap_or(0)) as usize;
    }
    diff == 0
}
