//! Learner settings and the preference catalog

use axum::{
    extract::{Path, State},
    Json,
};
use learnpath_common::models::LearnerId;
use learnpath_common::settings::{LearnerSettings, Profile, PREFERENCE_METADATA};
use serde::{Deserialize, Serialize};

use super::error::{ApiJson, ApiResult};
use crate::AppState;

/// Preference catalog row
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRow {
    pub key: String,
    pub default_value: String,
    pub allowed: Vec<String>,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct PreferenceRequest {
    pub value: String,
}

/// GET /api/preferences
///
/// Every preference a learner may set, with its default and accepted values.
pub async fn preference_catalog() -> Json<Vec<PreferenceRow>> {
    let rows = PREFERENCE_METADATA
        .iter()
        .map(|meta| PreferenceRow {
            key: meta.key.to_string(),
            default_value: meta.default_value.to_string(),
            allowed: meta.allowed.iter().map(|v| v.to_string()).collect(),
            description: meta.description.to_string(),
        })
        .collect();
    Json(rows)
}

/// GET /api/learners/:learner/settings
pub async fn get_settings(
    State(state): State<AppState>,
    Path(learner): Path<LearnerId>,
) -> Json<LearnerSettings> {
    Json(state.store.settings(&learner).await)
}

/// PUT /api/learners/:learner/settings/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Path(learner): Path<LearnerId>,
    ApiJson(profile): ApiJson<Profile>,
) -> ApiResult<Json<LearnerSettings>> {
    Ok(Json(state.store.update_profile(&learner, profile).await?))
}

/// PUT /api/learners/:learner/settings/notifications/:key
pub async fn set_notification(
    State(state): State<AppState>,
    Path((learner, key)): Path<(LearnerId, String)>,
    ApiJson(request): ApiJson<NotificationRequest>,
) -> ApiResult<Json<LearnerSettings>> {
    let settings = state
        .store
        .set_notification(&learner, &key, request.enabled)
        .await?;
    Ok(Json(settings))
}

/// PUT /api/learners/:learner/settings/preferences/:key
pub async fn set_preference(
    State(state): State<AppState>,
    Path((learner, key)): Path<(LearnerId, String)>,
    ApiJson(request): ApiJson<PreferenceRequest>,
) -> ApiResult<Json<LearnerSettings>> {
    let settings = state
        .store
        .set_preference(&learner, &key, &request.value)
        .await?;
    Ok(Json(settings))
}
