//! In-memory record store
//!
//! Plays the part of the course/progress data-access layer: CRUD over the
//! catalog and per-learner records, each call delayed by a configurable
//! simulated network latency.
//!
//! Collections sit behind separate `RwLock`s. No method holds more than one
//! write lock, and read locks are released before a write lock is taken.

use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{
    Bookmark, Course, CourseUpdate, LearnerId, Lesson, NewBookmark, ProgressRecord, Quiz,
};
use crate::progress::{self, VIDEO_COMPLETION_THRESHOLD};
use crate::quiz::{grade_quiz, QuizResult};
use crate::seed::SeedData;
use crate::settings::{LearnerSettings, Profile};
use crate::{Error, Result};

/// Result of submitting a quiz attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub result: QuizResult,
    /// Updated record, if the learner is enrolled in the quiz's course
    pub progress: Option<ProgressRecord>,
}

pub struct LearnStore {
    latency: Duration,
    courses: RwLock<Vec<Course>>,
    lessons: RwLock<Vec<Lesson>>,
    quizzes: RwLock<Vec<Quiz>>,
    progress: RwLock<HashMap<LearnerId, Vec<ProgressRecord>>>,
    bookmarks: RwLock<HashMap<LearnerId, Vec<Bookmark>>>,
    settings: RwLock<HashMap<LearnerId, LearnerSettings>>,
}

impl LearnStore {
    /// Create a store from seed data, with no simulated latency
    pub fn new(seed: SeedData) -> Self {
        info!(
            "Record store seeded: {} courses, {} lessons, {} quizzes, {} learners",
            seed.courses.len(),
            seed.lessons.len(),
            seed.quizzes.len(),
            seed.progress.len()
        );
        Self {
            latency: Duration::ZERO,
            courses: RwLock::new(seed.courses),
            lessons: RwLock::new(seed.lessons),
            quizzes: RwLock::new(seed.quizzes),
            progress: RwLock::new(seed.progress),
            bookmarks: RwLock::new(HashMap::new()),
            settings: RwLock::new(HashMap::new()),
        }
    }

    /// Store seeded with the bundled mock catalog
    pub fn bundled() -> Result<Self> {
        Ok(Self::new(SeedData::bundled()?))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(SeedData::from_file(path)?))
    }

    /// Apply `latency` to every subsequent call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Catalog size, read without simulated latency
    pub async fn course_count(&self) -> usize {
        self.courses.read().await.len()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    // ========================================
    // Courses
    // ========================================

    pub async fn list_courses(&self) -> Vec<Course> {
        self.simulate_latency().await;
        self.courses.read().await.clone()
    }

    pub async fn get_course(&self, id: &str) -> Result<Course> {
        self.simulate_latency().await;
        self.courses
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Course {}", id)))
    }

    /// Add a course under a freshly generated id
    pub async fn create_course(&self, mut course: Course) -> Course {
        self.simulate_latency().await;
        course.id = uuid::Uuid::new_v4().to_string();
        info!("Created course {} ({})", course.id, course.title);
        self.courses.write().await.push(course.clone());
        course
    }

    pub async fn update_course(&self, id: &str, update: CourseUpdate) -> Result<Course> {
        self.simulate_latency().await;
        let mut courses = self.courses.write().await;
        let course = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("Course {}", id)))?;
        update.apply(course);
        Ok(course.clone())
    }

    /// Remove a course
    ///
    /// Progress records referencing it are kept; the aggregator and the
    /// recommendation engine ignore them.
    pub async fn delete_course(&self, id: &str) -> Result<Course> {
        self.simulate_latency().await;
        let mut courses = self.courses.write().await;
        let index = courses
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("Course {}", id)))?;
        info!("Deleted course {}", id);
        Ok(courses.remove(index))
    }

    // ========================================
    // Lessons and quizzes
    // ========================================

    /// Lessons of a course, sorted by `order`
    pub async fn lessons_for_course(&self, course_id: &str) -> Vec<Lesson> {
        self.simulate_latency().await;
        self.course_lessons(course_id).await
    }

    async fn course_lessons(&self, course_id: &str) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .read()
            .await
            .iter()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order);
        lessons
    }

    pub async fn get_lesson(&self, id: &str) -> Result<Lesson> {
        self.simulate_latency().await;
        self.lessons
            .read()
            .await
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Lesson {}", id)))
    }

    pub async fn get_quiz(&self, id: &str) -> Result<Quiz> {
        self.simulate_latency().await;
        self.find_quiz(id).await
    }

    async fn find_quiz(&self, id: &str) -> Result<Quiz> {
        self.quizzes
            .read()
            .await
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Quiz {}", id)))
    }

    /// Quiz attached to a lesson; not every lesson has one
    pub async fn quiz_for_lesson(&self, lesson_id: &str) -> Option<Quiz> {
        self.simulate_latency().await;
        self.quizzes
            .read()
            .await
            .iter()
            .find(|q| q.lesson_id == lesson_id)
            .cloned()
    }

    // ========================================
    // Progress
    // ========================================

    pub async fn list_progress(&self, learner: &LearnerId) -> Vec<ProgressRecord> {
        self.simulate_latency().await;
        let records = self
            .progress
            .read()
            .await
            .get(learner)
            .cloned()
            .unwrap_or_default();
        debug!("Learner {} has {} progress records", learner, records.len());
        records
    }

    pub async fn progress_for_course(
        &self,
        learner: &LearnerId,
        course_id: &str,
    ) -> Option<ProgressRecord> {
        self.simulate_latency().await;
        self.progress
            .read()
            .await
            .get(learner)
            .and_then(|records| records.iter().find(|p| p.course_id == course_id))
            .cloned()
    }

    /// Enroll a learner, creating an empty progress record
    ///
    /// # Errors
    /// `NotFound` if the course is not in the catalog, `Conflict` if the
    /// learner is already enrolled.
    pub async fn enroll(&self, learner: &LearnerId, course_id: &str) -> Result<ProgressRecord> {
        self.simulate_latency().await;

        if !self.courses.read().await.iter().any(|c| c.id == course_id) {
            return Err(Error::NotFound(format!("Course {}", course_id)));
        }

        let mut all_progress = self.progress.write().await;
        let records = all_progress.entry(learner.clone()).or_default();
        if records.iter().any(|p| p.course_id == course_id) {
            return Err(Error::Conflict(format!(
                "Learner {} already enrolled in course {}",
                learner, course_id
            )));
        }

        let record = ProgressRecord::new(course_id, Utc::now());
        records.push(record.clone());
        info!("Learner {} enrolled in course {}", learner, course_id);
        Ok(record)
    }

    pub async fn unenroll(&self, learner: &LearnerId, course_id: &str) -> Result<ProgressRecord> {
        self.simulate_latency().await;
        let mut all_progress = self.progress.write().await;
        let records = all_progress
            .get_mut(learner)
            .ok_or_else(|| not_enrolled(learner, course_id))?;
        let index = records
            .iter()
            .position(|p| p.course_id == course_id)
            .ok_or_else(|| not_enrolled(learner, course_id))?;
        info!("Learner {} left course {}", learner, course_id);
        Ok(records.remove(index))
    }

    /// Replace a learner's record for a course
    pub async fn update_progress(
        &self,
        learner: &LearnerId,
        record: ProgressRecord,
    ) -> Result<ProgressRecord> {
        self.simulate_latency().await;
        let mut all_progress = self.progress.write().await;
        let slot = all_progress
            .get_mut(learner)
            .and_then(|records| records.iter_mut().find(|p| p.course_id == record.course_id))
            .ok_or_else(|| not_enrolled(learner, &record.course_id))?;
        *slot = record;
        Ok(slot.clone())
    }

    /// Mark a lesson completed for an enrolled learner
    ///
    /// The percentage is recomputed from the number of lessons the course
    /// actually has. Completing an already completed lesson changes nothing.
    pub async fn complete_lesson(
        &self,
        learner: &LearnerId,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<ProgressRecord> {
        self.simulate_latency().await;
        self.apply_lesson_completion(learner, course_id, lesson_id).await
    }

    async fn apply_lesson_completion(
        &self,
        learner: &LearnerId,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<ProgressRecord> {
        let lessons = self.course_lessons(course_id).await;
        if !lessons.iter().any(|l| l.id == lesson_id) {
            return Err(Error::NotFound(format!(
                "Lesson {} in course {}",
                lesson_id, course_id
            )));
        }

        let mut all_progress = self.progress.write().await;
        let record = all_progress
            .get_mut(learner)
            .and_then(|records| records.iter_mut().find(|p| p.course_id == course_id))
            .ok_or_else(|| not_enrolled(learner, course_id))?;

        if progress::complete_lesson(record, lesson_id, lessons.len(), Utc::now()) {
            info!(
                "Learner {} completed lesson {} ({}% of course {})",
                learner, lesson_id, record.completion_percentage, course_id
            );
        }
        Ok(record.clone())
    }

    /// Report video playback progress for a lesson
    ///
    /// Reaching [`VIDEO_COMPLETION_THRESHOLD`] percent completes the lesson.
    pub async fn record_video_progress(
        &self,
        learner: &LearnerId,
        course_id: &str,
        lesson_id: &str,
        percent: u32,
    ) -> Result<ProgressRecord> {
        if percent > 100 {
            return Err(Error::InvalidInput(format!(
                "Video progress out of range: {}",
                percent
            )));
        }
        self.simulate_latency().await;

        if percent >= u32::from(VIDEO_COMPLETION_THRESHOLD) {
            return self.apply_lesson_completion(learner, course_id, lesson_id).await;
        }

        self.progress
            .read()
            .await
            .get(learner)
            .and_then(|records| records.iter().find(|p| p.course_id == course_id))
            .cloned()
            .ok_or_else(|| not_enrolled(learner, course_id))
    }

    /// Grade a quiz attempt and keep the learner's best score
    pub async fn submit_quiz(
        &self,
        learner: &LearnerId,
        quiz_id: &str,
        answers: &BTreeMap<String, usize>,
    ) -> Result<QuizSubmission> {
        self.simulate_latency().await;
        let quiz = self.find_quiz(quiz_id).await?;
        let result = grade_quiz(&quiz, answers)?;

        let mut all_progress = self.progress.write().await;
        let record = all_progress
            .get_mut(learner)
            .and_then(|records| records.iter_mut().find(|p| p.course_id == quiz.course_id));

        let updated = record.map(|record| {
            progress::record_quiz_score(record, &quiz.lesson_id, result.score, Utc::now());
            record.clone()
        });

        info!(
            "Learner {} scored {}% on quiz {} (passed: {})",
            learner, result.score, quiz.id, result.passed
        );

        Ok(QuizSubmission {
            result,
            progress: updated,
        })
    }

    // ========================================
    // Bookmarks
    // ========================================

    pub async fn bookmarks(&self, learner: &LearnerId) -> Vec<Bookmark> {
        self.simulate_latency().await;
        self.bookmarks
            .read()
            .await
            .get(learner)
            .cloned()
            .unwrap_or_default()
    }

    /// Bookmark a lesson, or remove the bookmark if it already exists
    ///
    /// Returns the learner's bookmarks after the change.
    pub async fn toggle_bookmark(&self, learner: &LearnerId, new: NewBookmark) -> Vec<Bookmark> {
        self.simulate_latency().await;
        let mut bookmarks = self.bookmarks.write().await;
        let list = bookmarks.entry(learner.clone()).or_default();

        match list.iter().position(|b| b.lesson_id == new.lesson_id) {
            Some(index) => {
                list.remove(index);
                debug!("Learner {} removed bookmark for {}", learner, new.lesson_id);
            }
            None => {
                debug!("Learner {} bookmarked {}", learner, new.lesson_id);
                list.push(Bookmark {
                    id: uuid::Uuid::new_v4().to_string(),
                    lesson_id: new.lesson_id,
                    course_id: new.course_id,
                    lesson_title: new.lesson_title,
                    bookmarked_at: Utc::now(),
                });
            }
        }
        list.clone()
    }

    pub async fn is_bookmarked(&self, learner: &LearnerId, lesson_id: &str) -> bool {
        self.simulate_latency().await;
        self.bookmarks
            .read()
            .await
            .get(learner)
            .map_or(false, |list| list.iter().any(|b| b.lesson_id == lesson_id))
    }

    /// Remove a bookmark if present; returns the remaining bookmarks
    pub async fn remove_bookmark(&self, learner: &LearnerId, lesson_id: &str) -> Vec<Bookmark> {
        self.simulate_latency().await;
        let mut bookmarks = self.bookmarks.write().await;
        match bookmarks.get_mut(learner) {
            Some(list) => {
                list.retain(|b| b.lesson_id != lesson_id);
                list.clone()
            }
            None => Vec::new(),
        }
    }

    // ========================================
    // Settings
    // ========================================

    /// Learner settings, defaults if never saved
    pub async fn settings(&self, learner: &LearnerId) -> LearnerSettings {
        self.simulate_latency().await;
        self.settings
            .read()
            .await
            .get(learner)
            .cloned()
            .unwrap_or_default()
    }

    async fn modify_settings<F>(&self, learner: &LearnerId, change: F) -> Result<LearnerSettings>
    where
        F: FnOnce(&mut LearnerSettings) -> Result<()>,
    {
        self.simulate_latency().await;
        let mut all = self.settings.write().await;
        let mut settings = all.get(learner).cloned().unwrap_or_default();
        change(&mut settings)?;
        all.insert(learner.clone(), settings.clone());
        Ok(settings)
    }

    pub async fn update_profile(
        &self,
        learner: &LearnerId,
        profile: Profile,
    ) -> Result<LearnerSettings> {
        self.modify_settings(learner, |s| s.set_profile(profile)).await
    }

    pub async fn set_notification(
        &self,
        learner: &LearnerId,
        key: &str,
        enabled: bool,
    ) -> Result<LearnerSettings> {
        self.modify_settings(learner, |s| s.set_notification(key, enabled))
            .await
    }

    pub async fn set_preference(
        &self,
        learner: &LearnerId,
        key: &str,
        value: &str,
    ) -> Result<LearnerSettings> {
        self.modify_settings(learner, |s| s.set_preference(key, value))
            .await
    }
}

fn not_enrolled(learner: &LearnerId, course_id: &str) -> Error {
    Error::NotFound(format!(
        "Learner {} is not enrolled in course {}",
        learner, course_id
    ))
}
