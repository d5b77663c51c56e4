//! Seed data for the in-memory record store

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::models::{Course, LearnerId, Lesson, ProgressRecord, Quiz};
use crate::Result;

/// Mock catalog shipped with the crate
const BUNDLED_SEED: &str = include_str!("../data/seed.json");

/// Learner used by the bundled progress records
pub const DEMO_LEARNER: &str = "explorer";

/// Initial contents of a [`crate::store::LearnStore`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    /// Progress records keyed by learner
    #[serde(default)]
    pub progress: HashMap<LearnerId, Vec<ProgressRecord>>,
}

impl SeedData {
    pub fn bundled() -> Result<Self> {
        Ok(serde_json::from_str(BUNDLED_SEED)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_seed_parses() {
        let seed = SeedData::bundled().unwrap();
        assert!(!seed.courses.is_empty());
        assert!(!seed.lessons.is_empty());
        assert!(seed.progress.contains_key(&LearnerId::new(DEMO_LEARNER)));
    }

    #[test]
    fn test_bundled_lessons_reference_catalog_courses() {
        let seed = SeedData::bundled().unwrap();
        for lesson in &seed.lessons {
            assert!(
                seed.courses.iter().any(|c| c.id == lesson.course_id),
                "lesson {} references unknown course {}",
                lesson.id,
                lesson.course_id
            );
        }
    }

    #[test]
    fn test_bundled_quizzes_reference_lessons() {
        let seed = SeedData::bundled().unwrap();
        for quiz in &seed.quizzes {
            assert!(seed
                .lessons
                .iter()
                .any(|l| l.id == quiz.lesson_id && l.course_id == quiz.course_id));
            assert!(quiz
                .questions
                .iter()
                .all(|q| q.correct_answer < q.options.len()));
        }
    }
}
