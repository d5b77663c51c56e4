//! Quiz grading

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Quiz;
use crate::{Error, Result};

/// Outcome of grading one quiz attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub correct_answers: usize,
    pub total_questions: usize,
    /// Rounded percentage, 0-100
    pub score: u8,
    pub passing_score: u8,
    pub passed: bool,
}

/// Grade `answers` (question id -> selected option index) against `quiz`
///
/// # Errors
/// `InvalidInput` if the quiz has no questions or any question is
/// unanswered. Answers for unknown question ids are ignored.
pub fn grade_quiz(quiz: &Quiz, answers: &BTreeMap<String, usize>) -> Result<QuizResult> {
    let total_questions = quiz.questions.len();
    if total_questions == 0 {
        return Err(Error::InvalidInput(format!("Quiz {} has no questions", quiz.id)));
    }

    let unanswered: Vec<&str> = quiz
        .questions
        .iter()
        .filter(|q| !answers.contains_key(&q.id))
        .map(|q| q.id.as_str())
        .collect();
    if !unanswered.is_empty() {
        return Err(Error::InvalidInput(format!(
            "Unanswered questions: {}",
            unanswered.join(", ")
        )));
    }

    let correct_answers = quiz
        .questions
        .iter()
        .filter(|q| answers.get(&q.id) == Some(&q.correct_answer))
        .count();
    let score = (correct_answers as f64 / total_questions as f64 * 100.0).round() as u8;

    Ok(QuizResult {
        quiz_id: quiz.id.clone(),
        correct_answers,
        total_questions,
        score,
        passing_score: quiz.passing_score,
        passed: score >= quiz.passing_score,
    })
}
