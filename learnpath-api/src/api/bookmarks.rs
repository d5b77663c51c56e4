//! Lesson bookmarks

use axum::{
    extract::{Path, State},
    Json,
};
use learnpath_common::models::{Bookmark, LearnerId, NewBookmark};

use super::error::ApiJson;
use crate::AppState;

/// GET /api/learners/:learner/bookmarks
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Path(learner): Path<LearnerId>,
) -> Json<Vec<Bookmark>> {
    Json(state.store.bookmarks(&learner).await)
}

/// POST /api/learners/:learner/bookmarks
///
/// Adds the bookmark, or removes it if the lesson is already bookmarked.
/// Responds with the learner's bookmarks after the change.
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(learner): Path<LearnerId>,
    ApiJson(request): ApiJson<NewBookmark>,
) -> Json<Vec<Bookmark>> {
    Json(state.store.toggle_bookmark(&learner, request).await)
}
