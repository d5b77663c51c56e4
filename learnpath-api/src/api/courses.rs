//! Catalog browsing: courses, categories, lessons and quizzes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use learnpath_common::catalog::{adjacent_lessons, categories, filter_courses, CourseFilter};
use learnpath_common::models::{Course, Lesson, Quiz};
use learnpath_common::Error;
use serde::Serialize;

use super::error::ApiResult;
use crate::AppState;

/// Neighbouring lesson summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonLink {
    pub id: String,
    pub title: String,
}

impl From<&Lesson> for LessonLink {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
        }
    }
}

/// Lesson with its position in the course
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub previous: Option<LessonLink>,
    pub next: Option<LessonLink>,
    pub has_quiz: bool,
}

/// GET /api/courses?search=&category=&difficulty=
pub async fn list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> Json<Vec<Course>> {
    let courses = state.store.list_courses().await;
    Json(filter_courses(&courses, &filter))
}

/// GET /api/courses/:id
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Course>> {
    Ok(Json(state.store.get_course(&id).await?))
}

/// GET /api/courses/:id/lessons
pub async fn course_lessons(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Lesson>>> {
    // Unknown course is a 404, not an empty list
    state.store.get_course(&id).await?;
    Ok(Json(state.store.lessons_for_course(&id).await))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    let courses = state.store.list_courses().await;
    Json(categories(&courses))
}

/// GET /api/lessons/:id
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LessonDetail>> {
    let lesson = state.store.get_lesson(&id).await?;
    let siblings = state.store.lessons_for_course(&lesson.course_id).await;
    let (previous, next) = adjacent_lessons(&siblings, &lesson.id);
    let has_quiz = state.store.quiz_for_lesson(&lesson.id).await.is_some();

    Ok(Json(LessonDetail {
        previous: previous.map(LessonLink::from),
        next: next.map(LessonLink::from),
        lesson,
        has_quiz,
    }))
}

/// GET /api/lessons/:id/quiz
pub async fn lesson_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Quiz>> {
    let quiz = state
        .store
        .quiz_for_lesson(&id)
        .await
        .ok_or_else(|| Error::NotFound(format!("Quiz for lesson {}", id)))?;
    Ok(Json(quiz))
}
