//! Learner-scoped progress, quiz, stats and recommendation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use learnpath_common::models::{EnrolledCourse, LearnerId, ProgressRecord};
use learnpath_common::progress::enrolled_courses;
use learnpath_common::store::QuizSubmission;
use learnpath_common::{
    compute_achievements, compute_stats, get_recommendations, Achievement, OverallStats,
    RecommendedCourse,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{ApiJson, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VideoProgressRequest {
    /// Percentage of the video watched; the store rejects values above 100
    pub percent: u32,
}

#[derive(Debug, Deserialize)]
pub struct QuizSubmitRequest {
    /// Question id -> selected option index
    pub answers: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: OverallStats,
    pub achievements: Vec<Achievement>,
}

/// GET /api/learners/:learner/progress
///
/// Enrolled courses joined with their progress, in catalog order.
pub async fn learner_progress(
    State(state): State<AppState>,
    Path(learner): Path<LearnerId>,
) -> Json<Vec<EnrolledCourse>> {
    let courses = state.store.list_courses().await;
    let progress = state.store.list_progress(&learner).await;
    Json(enrolled_courses(&courses, &progress))
}

/// POST /api/learners/:learner/courses/:course/enroll
pub async fn enroll(
    State(state): State<AppState>,
    Path((learner, course_id)): Path<(LearnerId, String)>,
) -> ApiResult<(StatusCode, Json<ProgressRecord>)> {
    let record = state.store.enroll(&learner, &course_id).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/learners/:learner/courses/:course/lessons/:lesson/complete
pub async fn complete_lesson(
    State(state): State<AppState>,
    Path((learner, course_id, lesson_id)): Path<(LearnerId, String, String)>,
) -> ApiResult<Json<ProgressRecord>> {
    let record = state
        .store
        .complete_lesson(&learner, &course_id, &lesson_id)
        .await?;
    Ok(Json(record))
}

/// POST /api/learners/:learner/courses/:course/lessons/:lesson/video
pub async fn video_progress(
    State(state): State<AppState>,
    Path((learner, course_id, lesson_id)): Path<(LearnerId, String, String)>,
    ApiJson(request): ApiJson<VideoProgressRequest>,
) -> ApiResult<Json<ProgressRecord>> {
    let record = state
        .store
        .record_video_progress(&learner, &course_id, &lesson_id, request.percent)
        .await?;
    Ok(Json(record))
}

/// POST /api/learners/:learner/quizzes/:quiz/submit
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path((learner, quiz_id)): Path<(LearnerId, String)>,
    ApiJson(request): ApiJson<QuizSubmitRequest>,
) -> ApiResult<Json<QuizSubmission>> {
    let submission = state
        .store
        .submit_quiz(&learner, &quiz_id, &request.answers)
        .await?;
    Ok(Json(submission))
}

/// GET /api/learners/:learner/stats
pub async fn learner_stats(
    State(state): State<AppState>,
    Path(learner): Path<LearnerId>,
) -> Json<StatsResponse> {
    let courses = state.store.list_courses().await;
    let progress = state.store.list_progress(&learner).await;
    let stats = compute_stats(&courses, &progress);
    Json(StatsResponse {
        achievements: compute_achievements(&stats),
        stats,
    })
}

/// GET /api/learners/:learner/recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    Path(learner): Path<LearnerId>,
) -> Json<Vec<RecommendedCourse>> {
    let courses = state.store.list_courses().await;
    let progress = state.store.list_progress(&learner).await;
    Json(get_recommendations(&progress, &courses))
}
