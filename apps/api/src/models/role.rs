use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleRow {
    pub role_id: i32,
    pub title: String,
    pub description_prompt: String,
    pub description_ai: String,
    pub years_of_experience: String,
    pub department: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A role together with the number of applications filed against it.
#[derive(Debug, Clone, FromRow)]
pub struct RoleWithCountRow {
    #[sqlx(flatten)]
    pub role: RoleRow,
    pub application_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleStatsRow {
    pub total_roles: i64,
    pub total_candidates: i64,
}

/// Validated input for inserting a role and its two question sets.
#[derive(Debug, Clone)]
pub struct NewRole {
    pub title: String,
    pub description_prompt: String,
    pub description_ai: String,
    pub years_of_experience: String,
    pub department: Option<String>,
    pub skills: Vec<String>,
    pub candidate_evaluation_questions: Vec<String>,
    pub role_related_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub question_id: i32,
    pub role_id: i32,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerRow {
    pub question_id: i32,
    pub application_id: i32,
    pub answer: String,
    pub is_in_resume: bool,
}

/// A question joined with every answer row recorded for one application.
/// More than one answer is a data-integrity fault; callers must check.
#[derive(Debug, Clone)]
pub struct QuestionWithAnswers {
    pub question: QuestionRow,
    pub answers: Vec<AnswerRow>,
}
