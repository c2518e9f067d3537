use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use super::{CreatedWindow, QuestionKind, RecordStore, StoreResult};
use crate::models::application::ApplicationRow;
use crate::models::document::{DocumentContentRow, DocumentMetaRow};
use crate::models::role::{
    AnswerRow, NewRole, QuestionRow, QuestionWithAnswers, RoleStatsRow, RoleWithCountRow,
};
use crate::models::user::UserRow;

const ROLE_WITH_COUNT_SELECT: &str = r#"
    SELECT r.*, COUNT(a.application_id) AS application_count
    FROM roles r
    LEFT JOIN applications a ON a.role_id = r.role_id
"#;

const APPLICATION_SELECT: &str = r#"
    SELECT a.application_id, a.role_id, r.title AS role_title, a.user_id,
           u.name AS candidate_name, u.rank AS candidate_rank,
           a.impact_communication, a.skill_recency,
           a.years_of_relevant_experience, a.total_experience,
           a.overall_rating, a.ai_summary, a.reviewer_comment,
           a.reviewer_id, a.status
    FROM applications a
    JOIN users u ON u.user_id = a.user_id
    JOIN roles r ON r.role_id = a.role_id
"#;

// The application filter lives in the join condition so unanswered questions survive.
const CANDIDATE_EVALUATION_QUESTIONS: &str = r#"
    SELECT q.question_id, q.role_id, q.question, ans.answer, ans.is_in_resume
    FROM candidate_evaluation_questions q
    LEFT JOIN candidate_evaluation_answers ans
           ON ans.question_id = q.question_id AND ans.application_id = $2
    WHERE q.role_id = $1
    ORDER BY q.question_id ASC
"#;

const ROLE_RELATED_QUESTIONS: &str = r#"
    SELECT q.question_id, q.role_id, q.question, ans.answer, ans.is_in_resume
    FROM role_related_questions q
    LEFT JOIN role_related_answers ans
           ON ans.question_id = q.question_id AND ans.application_id = $2
    WHERE q.role_id = $1
    ORDER BY q.question_id ASC
"#;

const INSERT_CANDIDATE_EVALUATION_QUESTIONS: &str = r#"
    INSERT INTO candidate_evaluation_questions (role_id, question)
    SELECT $1, q FROM UNNEST($2::text[]) WITH ORDINALITY AS u(q, ord)
    ORDER BY ord
"#;

const INSERT_ROLE_RELATED_QUESTIONS: &str = r#"
    INSERT INTO role_related_questions (role_id, question)
    SELECT $1, q FROM UNNEST($2::text[]) WITH ORDINALITY AS u(q, ord)
    ORDER BY ord
"#;

/// PostgreSQL-backed record store.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct QuestionAnswerJoinRow {
    question_id: i32,
    role_id: i32,
    question: String,
    answer: Option<String>,
    is_in_resume: Option<bool>,
}

/// Folds LEFT JOIN rows (ordered by question id) into one entry per question.
fn group_question_rows(
    rows: Vec<QuestionAnswerJoinRow>,
    application_id: i32,
) -> Vec<QuestionWithAnswers> {
    let mut grouped: Vec<QuestionWithAnswers> = Vec::new();
    for row in rows {
        let answer = match (row.answer, row.is_in_resume) {
            (Some(answer), Some(is_in_resume)) => Some(AnswerRow {
                question_id: row.question_id,
                application_id,
                answer,
                is_in_resume,
            }),
            _ => None,
        };

        let same_question = grouped
            .last()
            .is_some_and(|last| last.question.question_id == row.question_id);
        if !same_question {
            grouped.push(QuestionWithAnswers {
                question: QuestionRow {
                    question_id: row.question_id,
                    role_id: row.role_id,
                    question: row.question,
                },
                answers: Vec::new(),
            });
        }
        if let (Some(last), Some(answer)) = (grouped.last_mut(), answer) {
            last.answers.push(answer);
        }
    }
    grouped
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_roles(&self, window: Option<CreatedWindow>) -> StoreResult<Vec<RoleWithCountRow>> {
        let sql = format!(
            "{ROLE_WITH_COUNT_SELECT}
             WHERE ($1::timestamptz IS NULL OR r.created_at >= $1)
               AND ($2::timestamptz IS NULL OR r.created_at < $2)
             GROUP BY r.role_id
             ORDER BY r.title ASC"
        );
        Ok(sqlx::query_as::<_, RoleWithCountRow>(&sql)
            .bind(window.map(|w| w.from))
            .bind(window.map(|w| w.until))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_role(&self, role_id: i32) -> StoreResult<Option<RoleWithCountRow>> {
        let sql = format!("{ROLE_WITH_COUNT_SELECT} WHERE r.role_id = $1 GROUP BY r.role_id");
        Ok(sqlx::query_as::<_, RoleWithCountRow>(&sql)
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn role_stats(&self) -> StoreResult<RoleStatsRow> {
        Ok(sqlx::query_as::<_, RoleStatsRow>(
            r#"
            SELECT (SELECT COUNT(*) FROM roles) AS total_roles,
                   (SELECT COUNT(*) FROM applications) AS total_candidates
            "#,
        )
        .fetch_one(&self.pool)
        .await?)
    }

    async fn create_role(&self, role: &NewRole) -> StoreResult<i32> {
        let mut tx = self.pool.begin().await?;

        let role_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO roles
                (title, description_prompt, description_ai, years_of_experience, department, skills)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING role_id
            "#,
        )
        .bind(&role.title)
        .bind(&role.description_prompt)
        .bind(&role.description_ai)
        .bind(&role.years_of_experience)
        .bind(&role.department)
        .bind(&role.skills)
        .fetch_one(&mut *tx)
        .await?;

        if !role.candidate_evaluation_questions.is_empty() {
            sqlx::query(INSERT_CANDIDATE_EVALUATION_QUESTIONS)
                .bind(role_id)
                .bind(&role.candidate_evaluation_questions)
                .execute(&mut *tx)
                .await?;
        }

        if !role.role_related_questions.is_empty() {
            sqlx::query(INSERT_ROLE_RELATED_QUESTIONS)
                .bind(role_id)
                .bind(&role.role_related_questions)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            "Created role {role_id} with {} evaluation and {} role-related questions",
            role.candidate_evaluation_questions.len(),
            role.role_related_questions.len()
        );
        Ok(role_id)
    }

    async fn applications_for_role(&self, role_id: i32) -> StoreResult<Vec<ApplicationRow>> {
        let sql = format!(
            "{APPLICATION_SELECT}
             WHERE a.role_id = $1
             ORDER BY a.overall_rating DESC, a.application_id ASC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(role_id)
            .fetch_all(&self.pool)
            .await?;
        debug!("Fetched {} applications for role {role_id}", rows.len());
        Ok(rows)
    }

    async fn find_application(
        &self,
        role_id: i32,
        application_id: i32,
    ) -> StoreResult<Option<ApplicationRow>> {
        let sql = format!("{APPLICATION_SELECT} WHERE a.application_id = $1 AND a.role_id = $2");
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(application_id)
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<UserRow>> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn questions_with_answers(
        &self,
        kind: QuestionKind,
        role_id: i32,
        application_id: i32,
    ) -> StoreResult<Vec<QuestionWithAnswers>> {
        let sql = match kind {
            QuestionKind::CandidateEvaluation => CANDIDATE_EVALUATION_QUESTIONS,
            QuestionKind::RoleRelated => ROLE_RELATED_QUESTIONS,
        };
        let rows = sqlx::query_as::<_, QuestionAnswerJoinRow>(sql)
            .bind(role_id)
            .bind(application_id)
            .fetch_all(&self.pool)
            .await?;
        debug!(
            "Fetched {} {kind:?} question rows for role {role_id}, application {application_id}",
            rows.len()
        );
        Ok(group_question_rows(rows, application_id))
    }

    async fn documents_for_user(&self, user_id: Uuid) -> StoreResult<Vec<DocumentMetaRow>> {
        Ok(sqlx::query_as::<_, DocumentMetaRow>(
            r#"
            SELECT user_document_id, filename, mime_type, created_at
            FROM user_documents
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn document_content(&self, document_id: Uuid) -> StoreResult<Option<DocumentContentRow>> {
        Ok(sqlx::query_as::<_, DocumentContentRow>(
            "SELECT content, mime_type, filename FROM user_documents WHERE user_document_id = $1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
