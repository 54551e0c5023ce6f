//! Onboarding quiz payloads

use serde::{Deserialize, Serialize};

/// One answer choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

/// Onboarding quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

/// Chosen option for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: String,
    pub option_id: String,
}

/// `POST /quiz/submit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub answers: Vec<QuizAnswer>,
}

/// Outcome of a quiz submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, alias = "investorProfile")]
    pub investor_profile: Option<String>,
    #[serde(default, alias = "quizCompleted")]
    pub quiz_completed: bool,
}

/// `GET /quiz/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStatus {
    #[serde(alias = "quizCompleted")]
    pub quiz_completed: bool,
}
