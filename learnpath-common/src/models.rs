//! Catalog and learner record models
//!
//! Field names serialize in camelCase so bundled mock data and HTTP bodies
//! share one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Course difficulty
///
/// Unknown strings are rejected when decoding, so every course has a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Numeric rank used by the recommendation engine (beginner = 1)
    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(Error::InvalidInput(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// Explicit learner identity, threaded through every learner-scoped call
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(String);

impl LearnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LearnerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub total_lessons: u32,
    /// Display string, e.g. "6 hours"
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial course update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub total_lessons: Option<u32>,
    pub duration: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CourseUpdate {
    pub fn apply(self, course: &mut Course) {
        if let Some(title) = self.title {
            course.title = title;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
        if let Some(category) = self.category {
            course.category = category;
        }
        if let Some(difficulty) = self.difficulty {
            course.difficulty = difficulty;
        }
        if let Some(total_lessons) = self.total_lessons {
            course.total_lessons = total_lessons;
        }
        if let Some(duration) = self.duration {
            course.duration = duration;
        }
        if let Some(tags) = self.tags {
            course.tags = tags;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    /// 1-based position within the course
    pub order: u32,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub course_id: String,
    pub lesson_id: String,
    pub title: String,
    #[serde(default = "default_passing_score")]
    pub passing_score: u8,
    pub questions: Vec<QuizQuestion>,
}

fn default_passing_score() -> u8 {
    70
}

/// One learner's progress in one course
///
/// Existence of a record is what makes the course "enrolled".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    /// Best score per quiz key (the lesson id)
    #[serde(default)]
    pub quiz_scores: BTreeMap<String, u8>,
    /// Stored, not recomputed by the aggregator
    #[serde(default)]
    pub completion_percentage: u8,
    pub last_accessed: DateTime<Utc>,
}

impl ProgressRecord {
    /// Fresh record for a newly enrolled course
    pub fn new(course_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            course_id: course_id.into(),
            completed_lessons: Vec::new(),
            quiz_scores: BTreeMap::new(),
            completion_percentage: 0,
            last_accessed: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_percentage == 100
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub lesson_id: String,
    pub course_id: String,
    pub lesson_title: String,
    pub bookmarked_at: DateTime<Utc>,
}

/// Request to bookmark a lesson
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub lesson_id: String,
    pub course_id: String,
    pub lesson_title: String,
}

/// A catalog course joined with the learner's progress record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub course: Course,
    pub progress: ProgressRecord,
}
