//! HTTP API handlers for learnpath-api

pub mod bookmarks;
pub mod courses;
pub mod error;
pub mod health;
pub mod learners;
pub mod settings;

pub use bookmarks::{list_bookmarks, toggle_bookmark};
pub use courses::{course_lessons, get_course, get_lesson, lesson_quiz, list_categories, list_courses};
pub use error::{ApiError, ApiJson};
pub use health::health_routes;
pub use learners::{
    complete_lesson, enroll, learner_progress, learner_stats, recommendations, submit_quiz,
    video_progress,
};
pub use settings::{
    get_settings, preference_catalog, set_notification, set_preference, update_profile,
};
