//! Score normalization.
//!
//! `impact_communication` and `skill_recency` are stored as percentages scaled
//! by 100 (8500 == 85.00%). They are presented "out of 100" after exactly one
//! division by 100. Experience counts pass through untouched. No clamping:
//! out-of-range stored values surface as-is.

use serde::Serialize;

use crate::models::application::ApplicationRow;

pub const PERCENT_SCALE: f64 = 100.0;

pub fn normalize_scaled_percentage(stored: i32) -> f64 {
    f64::from(stored) / PERCENT_SCALE
}

/// The four application metrics in presentation form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationMetrics {
    pub impact_communication: f64,
    pub skill_recency: f64,
    pub years_relevant_exp: i32,
    pub total_exp: i32,
}

impl ApplicationMetrics {
    pub fn from_row(row: &ApplicationRow) -> Self {
        Self {
            impact_communication: normalize_scaled_percentage(row.impact_communication),
            skill_recency: normalize_scaled_percentage(row.skill_recency),
            years_relevant_exp: row.years_of_relevant_experience,
            total_exp: row.total_experience,
        }
    }
}
