use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Preferences, PreferencesPayload, Recommendation},
};

use super::AppState;

/// Echoed in place of an absent genre or mood
const UNKNOWN: &str = "unknown";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub recent_tracks: Vec<String>,
    #[serde(default)]
    pub preferences: Option<PreferencesPayload>,
}

impl RecommendRequest {
    /// The seed title: the first recent track, which must not be blank
    fn seed_title(&self) -> AppResult<&str> {
        let first = self.recent_tracks.first().ok_or_else(|| {
            AppError::InvalidInput("recent_tracks must contain at least one track".to_string())
        })?;

        let title = first.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput(
                "recent_tracks[0] must not be blank".to_string(),
            ));
        }
        Ok(title)
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendedTrack {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub genre: String,
    pub mood: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommended_track: RecommendedTrack,
}

#[derive(Debug, Serialize)]
pub struct RecommendedItem {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub mood: String,
    pub genre_hint: String,
    pub cover_art: Option<String>,
}

impl RecommendedItem {
    fn new(recommendation: Recommendation, prefs: &Preferences) -> Self {
        let Recommendation { record, cover_art } = recommendation;
        Self {
            artist: record.display_artist().to_string(),
            title: record.title.trim().to_string(),
            id: record.track_id,
            mood: prefs.mood.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            genre_hint: prefs.genre.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            cover_art,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendTopResponse {
    pub recommended_tracks: Vec<RecommendedItem>,
}

fn parse_body(body: Result<Json<RecommendRequest>, JsonRejection>) -> AppResult<RecommendRequest> {
    body.map(|Json(request)| request)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

fn echo_or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Resolves the first recent track and returns it as the recommendation
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let request = parse_body(body)?;
    let title = request.seed_title()?;
    let payload = request.preferences.clone().unwrap_or_default();
    let prefs = Preferences::from(payload.clone());

    tracing::info!(request_id = %request_id, title = %title, "Recommend request");

    let seed = state.recommender.resolve(title, &prefs).await?;
    let record = seed.record();

    Ok(Json(RecommendResponse {
        recommended_track: RecommendedTrack {
            id: record.track_id.clone(),
            artist: record.display_artist().to_string(),
            title: record.title.clone(),
            genre: echo_or_unknown(payload.genre.as_deref()),
            mood: echo_or_unknown(payload.mood.as_deref()),
        },
    }))
}

/// Returns up to five diverse recommendations for the first recent track
pub async fn recommend_top(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendTopResponse>> {
    let request = parse_body(body)?;
    let title = request.seed_title()?;
    let prefs = Preferences::from(request.preferences.clone().unwrap_or_default());

    tracing::info!(
        request_id = %request_id,
        title = %title,
        randomize = prefs.randomize,
        "Recommend top request"
    );

    let recommendations = state.recommender.recommend_top(title, &prefs).await?;

    Ok(Json(RecommendTopResponse {
        recommended_tracks: recommendations
            .into_iter()
            .map(|r| RecommendedItem::new(r, &prefs))
            .collect(),
    }))
}
