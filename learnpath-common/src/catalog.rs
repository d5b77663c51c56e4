//! Course catalog browsing helpers

use serde::Deserialize;

use crate::models::{Course, Difficulty, Lesson};

/// Catalog filter
///
/// Empty or `"all"` values match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilter {
    /// Case-insensitive substring of title or description
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                course.title.to_lowercase().contains(&term)
                    || course.description.to_lowercase().contains(&term)
            }
            _ => true,
        };

        let matches_category = selected(&self.category).map_or(true, |c| course.category == c);

        // An unparsable difficulty matches nothing
        let matches_difficulty = selected(&self.difficulty).map_or(true, |d| {
            d.parse::<Difficulty>()
                .map(|d| course.difficulty == d)
                .unwrap_or(false)
        });

        matches_search && matches_category && matches_difficulty
    }
}

/// Courses matching `filter`, in catalog order
pub fn filter_courses(courses: &[Course], filter: &CourseFilter) -> Vec<Course> {
    courses.iter().filter(|c| filter.matches(c)).cloned().collect()
}

/// Distinct categories in catalog order
pub fn categories(courses: &[Course]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for course in courses {
        if !seen.contains(&course.category) {
            seen.push(course.category.clone());
        }
    }
    seen
}

/// Previous and next lessons around `lesson_id`
///
/// `lessons` must already be sorted by `order`. An unknown id has no
/// neighbours.
pub fn adjacent_lessons<'a>(
    lessons: &'a [Lesson],
    lesson_id: &str,
) -> (Option<&'a Lesson>, Option<&'a Lesson>) {
    match lessons.iter().position(|l| l.id == lesson_id) {
        Some(index) => {
            let previous = index.checked_sub(1).and_then(|i| lessons.get(i));
            let next = lessons.get(index + 1);
            (previous, next)
        }
        None => (None, None),
    }
}
