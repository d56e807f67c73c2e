use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::tts::{estimate_duration, TtsServiceApi, Voice, VoiceSettings},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct VoicesQuery {
    pub language: Option<String>,
}

/// Request for POST /api/tts/estimate
#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub text: String,
    pub speaking_rate: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub words: usize,
    pub estimated_seconds: f64,
}

pub struct TtsController {
    tts_service: Arc<dyn TtsServiceApi>,
}

impl TtsController {
    pub fn new(tts_service: Arc<dyn TtsServiceApi>) -> Self {
        Self { tts_service }
    }

    /// GET /api/tts/voices?language=en-US
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
        Query(query): Query<VoicesQuery>,
    ) -> AppResult<Json<Vec<Voice>>> {
        let language = query
            .language
            .unwrap_or_else(|| VoiceSettings::default().language_code);
        let voices = controller.tts_service.list_voices(&language).await?;
        Ok(Json(voices))
    }

    /// POST /api/tts/estimate - Approximate spoken length of a text
    pub async fn estimate(Json(request): Json<EstimateRequest>) -> AppResult<Json<EstimateResponse>> {
        if request.text.trim().is_empty() {
            return Err(AppError::BadRequest("Text cannot be empty".to_string()));
        }

        let speaking_rate = request
            .speaking_rate
            .unwrap_or_else(|| VoiceSettings::default().speaking_rate);

        Ok(Json(EstimateResponse {
            words: request.text.split_whitespace().count(),
            estimated_seconds: estimate_duration(&request.text, speaking_rate),
        }))
    }
}
