use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An application joined with its candidate's name/rank and its role's title.
///
/// `impact_communication` and `skill_recency` are stored scaled by 100;
/// see `roles::scores` for how they are presented.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub application_id: i32,
    pub role_id: i32,
    pub role_title: String,
    pub user_id: Uuid,
    pub candidate_name: String,
    pub candidate_rank: Option<String>,
    pub impact_communication: i32,
    pub skill_recency: i32,
    pub years_of_relevant_experience: i32,
    pub total_experience: i32,
    pub overall_rating: f64,
    pub ai_summary: Option<String>,
    pub reviewer_comment: Option<String>,
    pub reviewer_id: Option<Uuid>,
    pub status: String,
}
