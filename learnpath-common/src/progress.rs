//! Progress aggregation
//!
//! Pure functions over a learner's progress records and the course catalog:
//! overall statistics, achievement badges, the enrolled-course view, and the
//! record mutations applied when a lesson or quiz is finished.
//!
//! A course is enrolled iff some progress record references its id.
//! Records pointing at courses missing from the catalog contribute nothing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{Course, EnrolledCourse, ProgressRecord};

/// Video playback percentage at which a lesson counts as completed
pub const VIDEO_COMPLETION_THRESHOLD: u8 = 90;

/// Aggregate statistics across enrolled courses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_courses: usize,
    pub completed_courses: usize,
    /// Rounded mean completion percentage (0 when nothing is enrolled)
    pub avg_progress: u8,
    pub total_lessons: usize,
}

/// Badge unlocked by crossing a fixed statistical threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Display hint for the presentation layer
    pub icon: &'static str,
    /// Human-readable unlock condition
    pub condition: &'static str,
}

struct AchievementRule {
    achievement: Achievement,
    unlocked: fn(&OverallStats) -> bool,
}

fn has_ten_lessons(stats: &OverallStats) -> bool {
    stats.total_lessons >= 10
}

fn has_finished_course(stats: &OverallStats) -> bool {
    stats.completed_courses >= 1
}

fn is_halfway(stats: &OverallStats) -> bool {
    stats.avg_progress >= 50
}

/// Evaluated in order; the order is the display order.
const ACHIEVEMENT_RULES: [AchievementRule; 3] = [
    AchievementRule {
        achievement: Achievement {
            id: "lessons-10",
            title: "Dedicated Learner",
            description: "Completed 10+ lessons",
            icon: "Award",
            condition: "totalLessons >= 10",
        },
        unlocked: has_ten_lessons,
    },
    AchievementRule {
        achievement: Achievement {
            id: "course-complete",
            title: "Course Finisher",
            description: "Completed your first course",
            icon: "Trophy",
            condition: "completedCourses >= 1",
        },
        unlocked: has_finished_course,
    },
    AchievementRule {
        achievement: Achievement {
            id: "halfway-hero",
            title: "Halfway Hero",
            description: "Average progress above 50%",
            icon: "TrendingUp",
            condition: "avgProgress >= 50",
        },
        unlocked: is_halfway,
    },
];

/// Join catalog courses with their progress records, in catalog order
///
/// When several records reference the same course the first one wins.
pub fn enrolled_courses(courses: &[Course], progress: &[ProgressRecord]) -> Vec<EnrolledCourse> {
    courses
        .iter()
        .filter_map(|course| {
            progress
                .iter()
                .find(|p| p.course_id == course.id)
                .map(|record| EnrolledCourse {
                    course: course.clone(),
                    progress: record.clone(),
                })
        })
        .collect()
}

/// Compute overall statistics for the enrolled set
pub fn compute_stats(courses: &[Course], progress: &[ProgressRecord]) -> OverallStats {
    let enrolled: Vec<&ProgressRecord> = courses
        .iter()
        .filter_map(|course| progress.iter().find(|p| p.course_id == course.id))
        .collect();

    let total_courses = enrolled.len();
    if total_courses == 0 {
        return OverallStats::default();
    }

    let completed_courses = enrolled.iter().filter(|p| p.is_completed()).count();
    let percentage_sum: u32 = enrolled
        .iter()
        .map(|p| u32::from(p.completion_percentage))
        .sum();
    let avg_progress = (f64::from(percentage_sum) / total_courses as f64).round() as u8;
    let total_lessons = enrolled.iter().map(|p| p.completed_lessons.len()).sum();

    debug!(
        total_courses,
        completed_courses, avg_progress, total_lessons, "Computed overall stats"
    );

    OverallStats {
        total_courses,
        completed_courses,
        avg_progress,
        total_lessons,
    }
}

/// Achievements unlocked by the given statistics
///
/// Independent threshold checks, returned in fixed order:
/// lessons, then completion, then average progress.
pub fn compute_achievements(stats: &OverallStats) -> Vec<Achievement> {
    ACHIEVEMENT_RULES
        .iter()
        .filter(|rule| (rule.unlocked)(stats))
        .map(|rule| rule.achievement.clone())
        .collect()
}

/// Completion percentage for `completed` of `total` lessons, capped at 100
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed as f64 / total as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// Mark a lesson completed and recompute the stored percentage
///
/// `total_lessons` is the number of lessons the course actually has.
/// Returns `false` (leaving the record untouched) if the lesson was
/// already completed.
pub fn complete_lesson(
    record: &mut ProgressRecord,
    lesson_id: &str,
    total_lessons: usize,
    now: DateTime<Utc>,
) -> bool {
    if record.completed_lessons.iter().any(|id| id == lesson_id) {
        return false;
    }

    record.completed_lessons.push(lesson_id.to_string());
    record.completion_percentage = completion_percentage(record.completed_lessons.len(), total_lessons);
    record.last_accessed = now;
    true
}

/// Record a quiz score, keeping the best score seen for `quiz_key`
///
/// Always touches `last_accessed`. Returns `true` if the stored score changed.
pub fn record_quiz_score(
    record: &mut ProgressRecord,
    quiz_key: &str,
    score: u8,
    now: DateTime<Utc>,
) -> bool {
    record.last_accessed = now;
    match record.quiz_scores.get(quiz_key) {
        Some(&best) if best >= score => false,
        _ => {
            record.quiz_scores.insert(quiz_key.to_string(), score);
            true
        }
    }
}
