//! Integration tests for the in-memory record store
//!
//! Tests cover:
//! - Catalog CRUD and lesson ordering
//! - Enrollment, lesson completion and video progress
//! - Quiz submission keeping best scores
//! - Bookmarks and learner settings
//! - Stats and recommendations computed from store contents

use learnpath_common::models::{CourseUpdate, Difficulty, LearnerId, NewBookmark};
use learnpath_common::seed::{SeedData, DEMO_LEARNER};
use learnpath_common::settings::Profile;
use learnpath_common::{compute_achievements, compute_stats, get_recommendations, Error, LearnStore};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

fn store() -> LearnStore {
    LearnStore::bundled().expect("bundled seed data")
}

fn demo() -> LearnerId {
    LearnerId::new(DEMO_LEARNER)
}

fn newcomer() -> LearnerId {
    LearnerId::new("newcomer")
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_get_unknown_course_is_not_found() {
    let store = store();
    assert!(matches!(store.get_course("nope").await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_lessons_sorted_by_order() {
    let store = store();
    let lessons = store.lessons_for_course("1").await;
    assert_eq!(lessons.len(), 4);
    assert!(lessons.windows(2).all(|w| w[0].order < w[1].order));
    assert!(store.lessons_for_course("nope").await.is_empty());
}

#[tokio::test]
async fn test_course_crud() {
    let store = store();
    let mut draft = store.get_course("1").await.unwrap();
    draft.title = "Portuguese for Beginners".into();

    let created = store.create_course(draft).await;
    assert_ne!(created.id, "1");

    let updated = store
        .update_course(
            &created.id,
            CourseUpdate {
                difficulty: Some(Difficulty::Intermediate),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.difficulty, Difficulty::Intermediate);
    assert_eq!(updated.title, "Portuguese for Beginners");

    store.delete_course(&created.id).await.unwrap();
    assert!(store.get_course(&created.id).await.is_err());
    assert!(matches!(
        store.delete_course(&created.id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_quiz_for_lesson_is_optional() {
    let store = store();
    assert_eq!(store.quiz_for_lesson("1-2").await.unwrap().id, "q1");
    assert!(store.quiz_for_lesson("1-3").await.is_none());
}

// =============================================================================
// Enrollment and lesson completion
// =============================================================================

#[tokio::test]
async fn test_enroll_creates_empty_record() {
    let store = store();
    let record = store.enroll(&newcomer(), "6").await.unwrap();
    assert_eq!(record.course_id, "6");
    assert_eq!(record.completion_percentage, 0);
    assert!(record.completed_lessons.is_empty());
    assert!(record.quiz_scores.is_empty());

    assert_eq!(store.list_progress(&newcomer()).await.len(), 1);
    // Learners are isolated from each other
    assert_eq!(store.list_progress(&demo()).await.len(), 2);
}

#[tokio::test]
async fn test_enroll_twice_conflicts() {
    let store = store();
    assert!(matches!(
        store.enroll(&demo(), "1").await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn test_enroll_unknown_course_not_found() {
    let store = store();
    assert!(matches!(
        store.enroll(&newcomer(), "nope").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_complete_lesson_updates_percentage() {
    let store = store();
    let record = store.complete_lesson(&demo(), "1", "1-3").await.unwrap();
    assert_eq!(record.completion_percentage, 75);
    assert_eq!(record.completed_lessons, vec!["1-1", "1-2", "1-3"]);

    // Idempotent
    let again = store.complete_lesson(&demo(), "1", "1-3").await.unwrap();
    assert_eq!(again.completed_lessons.len(), 3);

    let stored = store.progress_for_course(&demo(), "1").await.unwrap();
    assert_eq!(stored.completion_percentage, 75);
}

#[tokio::test]
async fn test_complete_lesson_requires_enrollment_and_real_lesson() {
    let store = store();
    assert!(matches!(
        store.complete_lesson(&newcomer(), "1", "1-1").await,
        Err(Error::NotFound(_))
    ));
    // Lesson belongs to a different course
    assert!(matches!(
        store.complete_lesson(&demo(), "1", "3-1").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_video_progress_threshold() {
    let store = store();
    store.enroll(&newcomer(), "6").await.unwrap();

    let record = store
        .record_video_progress(&newcomer(), "6", "6-1", 89)
        .await
        .unwrap();
    assert!(record.completed_lessons.is_empty());

    let record = store
        .record_video_progress(&newcomer(), "6", "6-1", 90)
        .await
        .unwrap();
    assert_eq!(record.completed_lessons, vec!["6-1"]);
    assert_eq!(record.completion_percentage, 50);

    assert!(matches!(
        store.record_video_progress(&newcomer(), "6", "6-1", 101).await,
        Err(Error::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_update_progress_replaces_record() {
    let store = store();
    let mut record = store.progress_for_course(&demo(), "1").await.unwrap();
    record.completion_percentage = 100;

    let updated = store.update_progress(&demo(), record).await.unwrap();
    assert!(updated.is_completed());

    let stray = learnpath_common::ProgressRecord::new("7", chrono::Utc::now());
    assert!(matches!(
        store.update_progress(&demo(), stray).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_get_quiz_by_id() {
    let store = store();
    let quiz = store.get_quiz("q2").await.unwrap();
    assert_eq!(quiz.lesson_id, "3-3");
    assert_eq!(quiz.passing_score, 80);
    assert!(store.get_quiz("q9").await.is_err());
}

#[tokio::test]
async fn test_unenroll_removes_record() {
    let store = store();
    store.unenroll(&demo(), "1").await.unwrap();
    assert!(store.progress_for_course(&demo(), "1").await.is_none());
    assert!(store.unenroll(&demo(), "1").await.is_err());
}

// =============================================================================
// Quizzes
// =============================================================================

fn q1_answers(picks: [usize; 4]) -> BTreeMap<String, usize> {
    picks
        .iter()
        .enumerate()
        .map(|(i, &pick)| (format!("q1-{}", i + 1), pick))
        .collect()
}

#[tokio::test]
async fn test_submit_quiz_keeps_best_score() {
    let store = store();
    // Seeded best score for lesson 1-2 is 95
    let submission = store
        .submit_quiz(&demo(), "q1", &q1_answers([1, 0, 2, 0]))
        .await
        .unwrap();
    assert_eq!(submission.result.score, 75);
    assert!(submission.result.passed);
    assert_eq!(submission.progress.unwrap().quiz_scores["1-2"], 95);

    let submission = store
        .submit_quiz(&demo(), "q1", &q1_answers([1, 0, 2, 1]))
        .await
        .unwrap();
    assert_eq!(submission.result.score, 100);
    assert_eq!(submission.progress.unwrap().quiz_scores["1-2"], 100);
}

#[tokio::test]
async fn test_submit_quiz_without_enrollment_still_grades() {
    let store = store();
    let submission = store
        .submit_quiz(&newcomer(), "q1", &q1_answers([0, 0, 0, 0]))
        .await
        .unwrap();
    assert_eq!(submission.result.score, 25);
    assert!(!submission.result.passed);
    assert!(submission.progress.is_none());
}

#[tokio::test]
async fn test_submit_incomplete_quiz_rejected() {
    let store = store();
    let mut answers = q1_answers([1, 0, 2, 1]);
    answers.remove("q1-4");
    assert!(matches!(
        store.submit_quiz(&demo(), "q1", &answers).await,
        Err(Error::InvalidInput(_))
    ));
}

// =============================================================================
// Bookmarks and settings
// =============================================================================

fn bookmark(lesson_id: &str) -> NewBookmark {
    NewBookmark {
        lesson_id: lesson_id.to_string(),
        course_id: "1".to_string(),
        lesson_title: format!("Lesson {}", lesson_id),
    }
}

#[tokio::test]
async fn test_toggle_bookmark_adds_then_removes() {
    let store = store();
    let list = store.toggle_bookmark(&demo(), bookmark("1-1")).await;
    assert_eq!(list.len(), 1);
    assert!(store.is_bookmarked(&demo(), "1-1").await);
    assert!(!store.is_bookmarked(&newcomer(), "1-1").await);

    let list = store.toggle_bookmark(&demo(), bookmark("1-1")).await;
    assert!(list.is_empty());
    assert!(!store.is_bookmarked(&demo(), "1-1").await);
}

#[tokio::test]
async fn test_remove_bookmark() {
    let store = store();
    store.toggle_bookmark(&demo(), bookmark("1-1")).await;
    store.toggle_bookmark(&demo(), bookmark("1-2")).await;

    let remaining = store.remove_bookmark(&demo(), "1-1").await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].lesson_id, "1-2");
    assert!(store.remove_bookmark(&newcomer(), "1-1").await.is_empty());
}

#[tokio::test]
async fn test_settings_default_then_persist_changes() {
    let store = store();
    let settings = store.settings(&demo()).await;
    assert_eq!(settings.preferences["theme"], "light");

    store.set_preference(&demo(), "theme", "dark").await.unwrap();
    store
        .set_notification(&demo(), "quizReminders", true)
        .await
        .unwrap();
    let profile = Profile {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        bio: String::new(),
        timezone: "UTC".into(),
        language: "en".into(),
    };
    store.update_profile(&demo(), profile).await.unwrap();

    let settings = store.settings(&demo()).await;
    assert_eq!(settings.preferences["theme"], "dark");
    assert!(settings.notifications["quizReminders"]);
    assert_eq!(settings.profile.name, "Ada");

    // Failed change leaves settings untouched
    assert!(store.set_preference(&demo(), "theme", "neon").await.is_err());
    assert_eq!(store.settings(&demo()).await.preferences["theme"], "dark");
}

// =============================================================================
// Derived views over store contents
// =============================================================================

#[tokio::test]
async fn test_demo_learner_stats_and_achievements() {
    let store = store();
    let courses = store.list_courses().await;
    let progress = store.list_progress(&demo()).await;

    let stats = compute_stats(&courses, &progress);
    assert_eq!(stats.total_courses, 2);
    assert_eq!(stats.completed_courses, 1);
    assert_eq!(stats.avg_progress, 75);
    assert_eq!(stats.total_lessons, 6);

    let ids: Vec<&str> = compute_achievements(&stats).iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["course-complete", "halfway-hero"]);
}

#[tokio::test]
async fn test_demo_learner_recommendations() {
    let store = store();
    let courses = store.list_courses().await;
    let progress = store.list_progress(&demo()).await;

    let recs = get_recommendations(&progress, &courses);
    assert_eq!(recs.len(), 5);
    assert!(recs.iter().all(|r| r.course.id != "1" && r.course.id != "3"));
    // Spanish II and React both score category + next level + popular + two tags
    let ids: Vec<&str> = recs.iter().map(|r| r.course.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "4", "6", "8", "5"]);
    assert!((recs[0].recommendation_score - 1.5).abs() < 1e-9);
    assert!((recs[1].recommendation_score - 1.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_deleted_course_is_ignored_by_aggregates() {
    let store = store();
    store.delete_course("3").await.unwrap();

    let courses = store.list_courses().await;
    let progress = store.list_progress(&demo()).await;
    assert_eq!(progress.len(), 2);

    let stats = compute_stats(&courses, &progress);
    assert_eq!(stats.total_courses, 1);
    assert_eq!(stats.completed_courses, 0);
    assert!(get_recommendations(&progress, &courses)
        .iter()
        .all(|r| r.course.id != "1"));
}

#[tokio::test]
async fn test_simulated_latency_delays_calls() {
    let store = LearnStore::new(SeedData::bundled().unwrap()).with_latency(Duration::from_millis(30));
    assert_eq!(store.latency(), Duration::from_millis(30));

    let start = Instant::now();
    store.list_courses().await;
    assert!(start.elapsed() >= Duration::from_millis(30));
}
