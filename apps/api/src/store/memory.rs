//! In-memory record store for unit and route tests.
//!
//! Mirrors the ordering contracts of `PgRecordStore` but enforces none of its
//! uniqueness constraints, so tests can seed the duplicate rows a looser
//! backend might hand back.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{CreatedWindow, QuestionKind, RecordStore, StoreError, StoreResult};
use crate::models::application::ApplicationRow;
use crate::models::document::{DocumentContentRow, DocumentMetaRow};
use crate::models::role::{
    AnswerRow, NewRole, QuestionRow, QuestionWithAnswers, RoleRow, RoleStatsRow, RoleWithCountRow,
};
use crate::models::user::UserRow;

/// Application fields as a writer would insert them, before any joins.
#[derive(Debug, Clone)]
pub struct SeedApplication {
    pub role_id: i32,
    pub user_id: Uuid,
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

impl SeedApplication {
    pub fn new(role_id: i32, user_id: Uuid) -> Self {
        Self {
            role_id,
            user_id,
            impact_communication: 0,
            skill_recency: 0,
            years_of_relevant_experience: 0,
            total_experience: 0,
            overall_rating: 0.0,
            ai_summary: None,
            reviewer_comment: None,
            reviewer_id: None,
            status: "Pending".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredApplication {
    application_id: i32,
    seed: SeedApplication,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    meta: DocumentMetaRow,
    user_id: Uuid,
    content: Vec<u8>,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    roles: Vec<RoleRow>,
    candidate_evaluation_questions: Vec<QuestionRow>,
    role_related_questions: Vec<QuestionRow>,
    applications: Vec<StoredApplication>,
    candidate_evaluation_answers: Vec<AnswerRow>,
    role_related_answers: Vec<AnswerRow>,
    documents: Vec<StoredDocument>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn questions(&self, kind: QuestionKind) -> &Vec<QuestionRow> {
        match kind {
            QuestionKind::CandidateEvaluation => &self.candidate_evaluation_questions,
            QuestionKind::RoleRelated => &self.role_related_questions,
        }
    }

    fn answers(&self, kind: QuestionKind) -> &Vec<AnswerRow> {
        match kind {
            QuestionKind::CandidateEvaluation => &self.candidate_evaluation_answers,
            QuestionKind::RoleRelated => &self.role_related_answers,
        }
    }

    fn with_count(&self, role: &RoleRow) -> RoleWithCountRow {
        let application_count = self
            .applications
            .iter()
            .filter(|a| a.seed.role_id == role.role_id)
            .count() as i64;
        RoleWithCountRow {
            role: role.clone(),
            application_count,
        }
    }

    fn joined(&self, stored: &StoredApplication) -> Option<ApplicationRow> {
        let seed = &stored.seed;
        let role = self.roles.iter().find(|r| r.role_id == seed.role_id)?;
        let user = self.users.iter().find(|u| u.user_id == seed.user_id)?;
        Some(ApplicationRow {
            application_id: stored.application_id,
            role_id: seed.role_id,
            role_title: role.title.clone(),
            user_id: seed.user_id,
            candidate_name: user.name.clone(),
            candidate_rank: user.rank.clone(),
            impact_communication: seed.impact_communication,
            skill_recency: seed.skill_recency,
            years_of_relevant_experience: seed.years_of_relevant_experience,
            total_experience: seed.total_experience,
            overall_rating: seed.overall_rating,
            ai_summary: seed.ai_summary.clone(),
            reviewer_comment: seed.reviewer_comment.clone(),
            reviewer_id: seed.reviewer_id,
            status: seed.status.clone(),
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing_users: Mutex<HashSet<Uuid>>,
    unavailable: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn add_user(&self, name: &str, rank: Option<&str>) -> Uuid {
        let user_id = Uuid::new_v4();
        self.tables.lock().unwrap().users.push(UserRow {
            user_id,
            name: name.to_string(),
            rank: rank.map(str::to_string),
            created_at: Utc::now(),
        });
        user_id
    }

    pub fn add_role(&self, title: &str, created_at: DateTime<Utc>) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        let role_id = tables.next_id();
        tables.roles.push(RoleRow {
            role_id,
            title: title.to_string(),
            description_prompt: format!("Hire a {title}"),
            description_ai: format!("We are looking for a {title}."),
            years_of_experience: "3".to_string(),
            department: None,
            skills: Vec::new(),
            created_at,
        });
        role_id
    }

    pub fn add_question(&self, kind: QuestionKind, role_id: i32, question: &str) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        let question_id = tables.next_id();
        let row = QuestionRow {
            question_id,
            role_id,
            question: question.to_string(),
        };
        match kind {
            QuestionKind::CandidateEvaluation => tables.candidate_evaluation_questions.push(row),
            QuestionKind::RoleRelated => tables.role_related_questions.push(row),
        }
        question_id
    }

    pub fn add_application(&self, seed: SeedApplication) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        let application_id = tables.next_id();
        tables.applications.push(StoredApplication {
            application_id,
            seed,
        });
        application_id
    }

    pub fn add_answer(
        &self,
        kind: QuestionKind,
        question_id: i32,
        application_id: i32,
        answer: &str,
        is_in_resume: bool,
    ) {
        let row = AnswerRow {
            question_id,
            application_id,
            answer: answer.to_string(),
            is_in_resume,
        };
        let mut tables = self.tables.lock().unwrap();
        match kind {
            QuestionKind::CandidateEvaluation => tables.candidate_evaluation_answers.push(row),
            QuestionKind::RoleRelated => tables.role_related_answers.push(row),
        }
    }

    pub fn add_document(
        &self,
        user_id: Uuid,
        filename: &str,
        mime_type: Option<&str>,
        content: &[u8],
        created_at: DateTime<Utc>,
    ) -> Uuid {
        let user_document_id = Uuid::new_v4();
        self.tables.lock().unwrap().documents.push(StoredDocument {
            meta: DocumentMetaRow {
                user_document_id,
                filename: filename.to_string(),
                mime_type: mime_type.map(str::to_string),
                created_at,
            },
            user_id,
            content: content.to_vec(),
        });
        user_document_id
    }

    /// Makes every `find_user` call for this id fail with `Unavailable`.
    pub fn fail_user_lookup(&self, user_id: Uuid) {
        self.failing_users.lock().unwrap().insert(user_id);
    }

    /// Makes every call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delays every call by `latency` before answering.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    async fn enter(&self) -> StoreResult<()> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_roles(&self, window: Option<CreatedWindow>) -> StoreResult<Vec<RoleWithCountRow>> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        let mut roles: Vec<RoleWithCountRow> = tables
            .roles
            .iter()
            .filter(|r| window.map_or(true, |w| w.from <= r.created_at && r.created_at < w.until))
            .map(|r| tables.with_count(r))
            .collect();
        roles.sort_by(|a, b| a.role.title.cmp(&b.role.title));
        Ok(roles)
    }

    async fn find_role(&self, role_id: i32) -> StoreResult<Option<RoleWithCountRow>> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .roles
            .iter()
            .find(|r| r.role_id == role_id)
            .map(|r| tables.with_count(r)))
    }

    async fn role_stats(&self) -> StoreResult<RoleStatsRow> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(RoleStatsRow {
            total_roles: tables.roles.len() as i64,
            total_candidates: tables.applications.len() as i64,
        })
    }

    async fn create_role(&self, role: &NewRole) -> StoreResult<i32> {
        self.enter().await?;
        let mut tables = self.tables.lock().unwrap();
        let role_id = tables.next_id();
        tables.roles.push(RoleRow {
            role_id,
            title: role.title.clone(),
            description_prompt: role.description_prompt.clone(),
            description_ai: role.description_ai.clone(),
            years_of_experience: role.years_of_experience.clone(),
            department: role.department.clone(),
            skills: role.skills.clone(),
            created_at: Utc::now(),
        });
        for question in &role.candidate_evaluation_questions {
            let question_id = tables.next_id();
            tables.candidate_evaluation_questions.push(QuestionRow {
                question_id,
                role_id,
                question: question.clone(),
            });
        }
        for question in &role.role_related_questions {
            let question_id = tables.next_id();
            tables.role_related_questions.push(QuestionRow {
                question_id,
                role_id,
                question: question.clone(),
            });
        }
        Ok(role_id)
    }

    async fn applications_for_role(&self, role_id: i32) -> StoreResult<Vec<ApplicationRow>> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<ApplicationRow> = tables
            .applications
            .iter()
            .filter(|a| a.seed.role_id == role_id)
            .filter_map(|a| tables.joined(a))
            .collect();
        rows.sort_by(|a, b| {
            b.overall_rating
                .total_cmp(&a.overall_rating)
                .then(a.application_id.cmp(&b.application_id))
        });
        Ok(rows)
    }

    async fn find_application(
        &self,
        role_id: i32,
        application_id: i32,
    ) -> StoreResult<Option<ApplicationRow>> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.application_id == application_id && a.seed.role_id == role_id)
            .and_then(|a| tables.joined(a)))
    }

    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<UserRow>> {
        self.enter().await?;
        if self.failing_users.lock().unwrap().contains(&user_id) {
            return Err(StoreError::Unavailable(format!("lookup of user {user_id} failed")));
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn questions_with_answers(
        &self,
        kind: QuestionKind,
        role_id: i32,
        application_id: i32,
    ) -> StoreResult<Vec<QuestionWithAnswers>> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        let mut questions: Vec<QuestionWithAnswers> = tables
            .questions(kind)
            .iter()
            .filter(|q| q.role_id == role_id)
            .map(|q| QuestionWithAnswers {
                question: q.clone(),
                answers: tables
                    .answers(kind)
                    .iter()
                    .filter(|a| a.question_id == q.question_id && a.application_id == application_id)
                    .cloned()
                    .collect(),
            })
            .collect();
        questions.sort_by_key(|q| q.question.question_id);
        Ok(questions)
    }

    async fn documents_for_user(&self, user_id: Uuid) -> StoreResult<Vec<DocumentMetaRow>> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        let mut documents: Vec<DocumentMetaRow> = tables
            .documents
            .iter()
            .filter(|d| d.user_id == user_id)
            .map(|d| d.meta.clone())
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn document_content(&self, document_id: Uuid) -> StoreResult<Option<DocumentContentRow>> {
        self.enter().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .documents
            .iter()
            .find(|d| d.meta.user_document_id == document_id)
            .map(|d| DocumentContentRow {
                content: d.content.clone(),
                mime_type: d.meta.mime_type.clone(),
                filename: d.meta.filename.clone(),
            }))
    }
}
