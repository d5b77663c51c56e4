//! learnpath-api library - HTTP surface over the LearnPath record store
//!
//! Catalog browsing is learner-independent; everything under
//! `/api/learners/:learner` is scoped to the learner named in the path.

use axum::Router;
use learnpath_common::LearnStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LearnStore>,
}

impl AppState {
    pub fn new(store: LearnStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let catalog = Router::new()
        .route("/api/courses", get(api::list_courses))
        .route("/api/courses/:id", get(api::get_course))
        .route("/api/courses/:id/lessons", get(api::course_lessons))
        .route("/api/categories", get(api::list_categories))
        .route("/api/lessons/:id", get(api::get_lesson))
        .route("/api/lessons/:id/quiz", get(api::lesson_quiz))
        .route("/api/preferences", get(api::preference_catalog));

    let learner = Router::new()
        .route("/api/learners/:learner/progress", get(api::learner_progress))
        .route(
            "/api/learners/:learner/courses/:course/enroll",
            post(api::enroll),
        )
        .route(
            "/api/learners/:learner/courses/:course/lessons/:lesson/complete",
            post(api::complete_lesson),
        )
        .route(
            "/api/learners/:learner/courses/:course/lessons/:lesson/video",
            post(api::video_progress),
        )
        .route(
            "/api/learners/:learner/quizzes/:quiz/submit",
            post(api::submit_quiz),
        )
        .route("/api/learners/:learner/stats", get(api::learner_stats))
        .route(
            "/api/learners/:learner/recommendations",
            get(api::recommendations),
        )
        .route(
            "/api/learners/:learner/bookmarks",
            get(api::list_bookmarks).post(api::toggle_bookmark),
        )
        .route("/api/learners/:learner/settings", get(api::get_settings))
        .route(
            "/api/learners/:learner/settings/profile",
            put(api::update_profile),
        )
        .route(
            "/api/learners/:learner/settings/notifications/:key",
            put(api::set_notification),
        )
        .route(
            "/api/learners/:learner/settings/preferences/:key",
            put(api::set_preference),
        );

    Router::new()
        .merge(catalog)
        .merge(learner)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
