//! Course recommendation engine
//!
//! Scores every course the learner is not enrolled in by summing
//! independent bonuses, then returns the top [`MAX_RECOMMENDATIONS`].
//!
//! **Bonuses:**
//! - Category already studied: +0.5
//! - Difficulty relative to the learner's level: same +0.3, one above +0.6,
//!   one below +0.2
//! - Popular (15+ lessons): +0.2
//! - +0.1 per candidate tag shared with any studied course
//!
//! The learner's level is the highest difficulty rank among studied courses.
//! Without learning history there are no recommendations.

use serde::{Serialize, Serializer};
use std::collections::HashSet;
use tracing::debug;

use crate::models::{Course, ProgressRecord};

/// Maximum number of courses returned
pub const MAX_RECOMMENDATIONS: usize = 5;

const CATEGORY_MATCH_BONUS: f64 = 0.5;
const SAME_LEVEL_BONUS: f64 = 0.3;
const NEXT_LEVEL_BONUS: f64 = 0.6;
const REVIEW_LEVEL_BONUS: f64 = 0.2;
const POPULAR_BONUS: f64 = 0.2;
const POPULAR_LESSON_THRESHOLD: u32 = 15;
const TAG_MATCH_BONUS: f64 = 0.1;

/// Level assumed when no studied course is in the catalog
const FALLBACK_LEVEL: u8 = 1;

/// Why a course was recommended
///
/// Serializes as the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationReason {
    NextLevel,
    PerfectMatch,
    StrengthenFoundation,
    ExpandKnowledge,
}

impl RecommendationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationReason::NextLevel => "Next level in your learning path",
            RecommendationReason::PerfectMatch => "Perfect match for your current level",
            RecommendationReason::StrengthenFoundation => "Strengthen your foundation",
            RecommendationReason::ExpandKnowledge => "Expand your knowledge into new areas",
        }
    }
}

impl Serialize for RecommendationReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A candidate course with its ranking score
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCourse {
    #[serde(flatten)]
    pub course: Course,
    /// Unitless additive heuristic, only meaningful for ordering
    pub recommendation_score: f64,
    pub reason: RecommendationReason,
}

/// What the learner has studied, derived from progress and catalog
struct LearningHistory<'a> {
    enrolled_ids: HashSet<&'a str>,
    /// Deduplicated, in catalog order
    categories: Vec<&'a str>,
    tags: HashSet<&'a str>,
    level: u8,
}

impl<'a> LearningHistory<'a> {
    fn new(progress: &'a [ProgressRecord], courses: &'a [Course]) -> Self {
        let enrolled_ids: HashSet<&str> = progress.iter().map(|p| p.course_id.as_str()).collect();

        let mut categories: Vec<&str> = Vec::new();
        let mut tags = HashSet::new();
        let mut level = None;

        for course in courses.iter().filter(|c| enrolled_ids.contains(c.id.as_str())) {
            if !categories.contains(&course.category.as_str()) {
                categories.push(&course.category);
            }
            tags.extend(course.tags.iter().map(String::as_str));
            level = level.max(Some(course.difficulty.rank()));
        }

        Self {
            enrolled_ids,
            categories,
            tags,
            level: level.unwrap_or(FALLBACK_LEVEL),
        }
    }

    fn studied_category(&self, category: &str) -> bool {
        self.categories.contains(&category)
    }

    fn score(&self, course: &Course) -> f64 {
        let mut score = 0.0;

        if self.studied_category(&course.category) {
            score += CATEGORY_MATCH_BONUS;
        }

        let rank = course.difficulty.rank();
        if rank == self.level {
            score += SAME_LEVEL_BONUS;
        } else if rank == self.level + 1 {
            score += NEXT_LEVEL_BONUS;
        } else if rank + 1 == self.level {
            score += REVIEW_LEVEL_BONUS;
        }

        if course.total_lessons >= POPULAR_LESSON_THRESHOLD {
            score += POPULAR_BONUS;
        }

        let shared_tags = course
            .tags
            .iter()
            .filter(|tag| self.tags.contains(tag.as_str()))
            .count();
        score += shared_tags as f64 * TAG_MATCH_BONUS;

        score
    }

    fn reason(&self, course: &Course) -> RecommendationReason {
        if !self.studied_category(&course.category) {
            return RecommendationReason::ExpandKnowledge;
        }
        match course.difficulty.rank().cmp(&self.level) {
            std::cmp::Ordering::Greater => RecommendationReason::NextLevel,
            std::cmp::Ordering::Equal => RecommendationReason::PerfectMatch,
            std::cmp::Ordering::Less => RecommendationReason::StrengthenFoundation,
        }
    }
}

/// Rank not-yet-enrolled courses for a learner
///
/// Deterministic for identical inputs. Ties keep catalog order.
pub fn get_recommendations(progress: &[ProgressRecord], courses: &[Course]) -> Vec<RecommendedCourse> {
    if progress.is_empty() || courses.is_empty() {
        return Vec::new();
    }

    let history = LearningHistory::new(progress, courses);

    let mut recommendations: Vec<RecommendedCourse> = courses
        .iter()
        .filter(|course| !history.enrolled_ids.contains(course.id.as_str()))
        .map(|course| RecommendedCourse {
            course: course.clone(),
            recommendation_score: history.score(course),
            reason: history.reason(course),
        })
        .collect();

    debug!(
        candidates = recommendations.len(),
        level = history.level,
        "Scored recommendation candidates"
    );

    // sort_by is stable
    recommendations.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use chrono::Utc;

    fn course(id: &str, category: &str, difficulty: Difficulty, lessons: u32) -> Course {
        Course {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            category: category.to_string(),
            difficulty,
            total_lessons: lessons,
            duration: String::new(),
            tags: vec![],
        }
    }

    fn enrolled(course_id: &str, pct: u8) -> ProgressRecord {
        let mut record = ProgressRecord::new(course_id, Utc::now());
        record.completion_percentage = pct;
        record
    }

    fn assert_score(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "score {} != {}", actual, expected);
    }

    #[test]
    fn test_empty_progress_yields_nothing() {
        let courses = vec![course("c1", "lang", Difficulty::Beginner, 5)];
        assert!(get_recommendations(&[], &courses).is_empty());
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        assert!(get_recommendations(&[enrolled("c1", 10)], &[]).is_empty());
    }

    #[test]
    fn test_next_level_in_same_category() {
        let courses = vec![
            course("c1", "lang", Difficulty::Beginner, 20),
            course("c2", "lang", Difficulty::Intermediate, 5),
        ];
        let recs = get_recommendations(&[enrolled("c1", 100)], &courses);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].course.id, "c2");
        assert_score(recs[0].recommendation_score, 1.1);
        assert_eq!(recs[0].reason, RecommendationReason::NextLevel);
        assert_eq!(recs[0].reason.as_str(), "Next level in your learning path");
    }

    #[test]
    fn test_same_level_in_same_category() {
        let courses = vec![
            course("c1", "lang", Difficulty::Beginner, 20),
            course("c2", "lang", Difficulty::Beginner, 5),
        ];
        let recs = get_recommendations(&[enrolled("c1", 100)], &courses);

        assert_score(recs[0].recommendation_score, 0.8);
        assert_eq!(recs[0].reason, RecommendationReason::PerfectMatch);
    }

    #[test]
    fn test_lower_level_strengthens_foundation() {
        let courses = vec![
            course("c1", "math", Difficulty::Advanced, 10),
            course("c2", "math", Difficulty::Intermediate, 10),
            course("c3", "math", Difficulty::Beginner, 10),
        ];
        let recs = get_recommendations(&[enrolled("c1", 50)], &courses);

        assert_eq!(recs[0].course.id, "c2");
        assert_score(recs[0].recommendation_score, 0.7);
        assert_eq!(recs[0].reason, RecommendationReason::StrengthenFoundation);
        // Two levels below: category bonus only
        assert_score(recs[1].recommendation_score, 0.5);
        assert_eq!(recs[1].reason, RecommendationReason::StrengthenFoundation);
    }

    #[test]
    fn test_new_category_expands_knowledge() {
        let courses = vec![
            course("c1", "lang", Difficulty::Beginner, 5),
            course("c2", "art", Difficulty::Advanced, 15),
        ];
        let recs = get_recommendations(&[enrolled("c1", 30)], &courses);

        // Popular bonus only: advanced is two above beginner
        assert_score(recs[0].recommendation_score, 0.2);
        assert_eq!(recs[0].reason, RecommendationReason::ExpandKnowledge);
    }

    #[test]
    fn test_level_is_highest_studied_difficulty() {
        let courses = vec![
            course("c1", "lang", Difficulty::Beginner, 5),
            course("c2", "code", Difficulty::Intermediate, 5),
            course("c3", "art", Difficulty::Advanced, 5),
        ];
        let progress = vec![enrolled("c1", 10), enrolled("c2", 10)];
        let recs = get_recommendations(&progress, &courses);

        assert_eq!(recs[0].course.id, "c3");
        assert_score(recs[0].recommendation_score, 0.6);
    }

    #[test]
    fn test_tag_overlap_bonus_counts_each_shared_tag() {
        let mut studied = course("c1", "code", Difficulty::Beginner, 5);
        studied.tags = vec!["rust".into(), "systems".into()];
        let mut candidate = course("c2", "data", Difficulty::Advanced, 5);
        candidate.tags = vec!["rust".into(), "systems".into(), "sql".into()];

        let recs = get_recommendations(&[enrolled("c1", 10)], &[studied, candidate]);
        assert_score(recs[0].recommendation_score, 0.2);
    }

    #[test]
    fn test_progress_for_unknown_courses_falls_back_to_beginner() {
        let courses = vec![
            course("c1", "lang", Difficulty::Beginner, 5),
            course("c2", "lang", Difficulty::Intermediate, 5),
        ];
        let recs = get_recommendations(&[enrolled("ghost", 10)], &courses);

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].course.id, "c2");
        assert_score(recs[0].recommendation_score, 0.6);
        assert_eq!(recs[0].reason, RecommendationReason::ExpandKnowledge);
        assert_score(recs[1].recommendation_score, 0.3);
    }

    #[test]
    fn test_at_most_five_sorted_and_never_enrolled() {
        let mut courses = vec![course("c0", "lang", Difficulty::Beginner, 5)];
        for i in 1..=9 {
            let difficulty = match i % 3 {
                0 => Difficulty::Beginner,
                1 => Difficulty::Intermediate,
                _ => Difficulty::Advanced,
            };
            courses.push(course(&format!("c{}", i), "lang", difficulty, i * 2));
        }
        let progress = vec![enrolled("c0", 100), enrolled("c3", 40)];

        let recs = get_recommendations(&progress, &courses);
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert!(recs
            .windows(2)
            .all(|w| w[0].recommendation_score >= w[1].recommendation_score));
        assert!(recs.iter().all(|r| r.course.id != "c0" && r.course.id != "c3"));
    }

    #[test]
    fn test_ties_keep_catalog_order_and_are_deterministic() {
        let courses = vec![
            course("c1", "lang", Difficulty::Beginner, 5),
            course("a", "lang", Difficulty::Beginner, 5),
            course("b", "lang", Difficulty::Beginner, 5),
            course("c", "lang", Difficulty::Beginner, 5),
        ];
        let progress = vec![enrolled("c1", 10)];

        let first = get_recommendations(&progress, &courses);
        let ids: Vec<&str> = first.iter().map(|r| r.course.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let second = get_recommendations(&progress, &courses);
        let again: Vec<&str> = second.iter().map(|r| r.course.id.as_str()).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_reason_serializes_as_message() {
        let value = serde_json::to_value(RecommendationReason::PerfectMatch).unwrap();
        assert_eq!(value, "Perfect match for your current level");
    }
}
