//! Candidate evaluation view — joins one application with its role's two
//! question sets, the per-question answers and the candidate's documents.

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::document::DocumentMetaRow;
use crate::models::role::{AnswerRow, QuestionWithAnswers};
use crate::roles::reviewer::ranked_name;
use crate::roles::scores::ApplicationMetrics;
use crate::roles::{parse_application_id, parse_role_id};
use crate::store::{QuestionKind, RecordStore, StoreError};

pub const CANDIDATE_EVALUATION_PLACEHOLDER: &str = "No evaluation provided yet.";
pub const ROLE_QUESTION_PLACEHOLDER: &str = "No assessment available yet.";

const EVALUATION_SECTION_ID: &str = "candidate-evaluations";
const EVALUATION_SECTION_TITLE: &str = "Candidate Evaluations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    NotInResume,
    InResume,
    Pending,
}

impl QuestionStatus {
    pub fn from_answer(answer: Option<&AnswerRow>) -> Self {
        match answer {
            None => QuestionStatus::Pending,
            Some(a) if a.is_in_resume => QuestionStatus::InResume,
            Some(_) => QuestionStatus::NotInResume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationQuestion {
    pub id: String,
    pub question: String,
    pub status: QuestionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleQuestion {
    pub id: String,
    pub question: String,
    pub status: QuestionStatus,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSection {
    pub id: String,
    pub title: String,
    pub questions: Vec<EvaluationQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationData {
    pub overall_rating: f64,
    pub ai_summary: String,
    pub reviewer_comment: String,
    #[serde(flatten)]
    pub metrics: ApplicationMetrics,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEvaluationData {
    /// The application id; the view is keyed by application, not by user.
    pub candidate_id: String,
    pub candidate_name: String,
    pub role_title: String,
    pub evaluation_sections: Vec<EvaluationSection>,
    pub role_questions: Vec<RoleQuestion>,
    pub application_data: ApplicationData,
    pub documents: Vec<DocumentMetaRow>,
}

/// Assembles the evaluation view for one application of one role.
///
/// `Ok(None)` means the application doesn't exist under that role. Any store
/// failure, or a question carrying more than one answer for the application,
/// aborts the whole view.
pub async fn candidate_evaluation(
    store: &dyn RecordStore,
    role_id: &str,
    application_id: &str,
) -> Result<Option<CandidateEvaluationData>, AppError> {
    let role_id = parse_role_id(role_id)?;
    let application_id = parse_application_id(application_id)?;

    let Some(application) = store.find_application(role_id, application_id).await? else {
        debug!("No application {application_id} under role {role_id}");
        return Ok(None);
    };

    let (evaluations, role_related, documents) = tokio::try_join!(
        store.questions_with_answers(QuestionKind::CandidateEvaluation, role_id, application_id),
        store.questions_with_answers(QuestionKind::RoleRelated, role_id, application_id),
        store.documents_for_user(application.user_id),
    )?;

    let evaluation_questions = evaluations
        .iter()
        .map(evaluation_question)
        .collect::<Result<Vec<_>, _>>()?;
    let role_questions = role_related
        .iter()
        .map(role_question)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Assembled evaluation for application {application_id}: {} evaluation questions, {} role questions, {} documents",
        evaluation_questions.len(),
        role_questions.len(),
        documents.len()
    );

    Ok(Some(assemble(application, evaluation_questions, role_questions, documents)))
}

/// At most one answer per (question, application) is allowed.
fn single_answer(entry: &QuestionWithAnswers) -> Result<Option<&AnswerRow>, StoreError> {
    match entry.answers.as_slice() {
        [] => Ok(None),
        [answer] => Ok(Some(answer)),
        many => Err(StoreError::Integrity(format!(
            "question {} has {} answers for application {}",
            entry.question.question_id,
            many.len(),
            many[0].application_id
        ))),
    }
}

fn evaluation_question(entry: &QuestionWithAnswers) -> Result<EvaluationQuestion, StoreError> {
    let answer = single_answer(entry)?;
    Ok(EvaluationQuestion {
        id: entry.question.question_id.to_string(),
        question: entry.question.question.clone(),
        status: QuestionStatus::from_answer(answer),
        answer: answer.map(|a| a.answer.clone()),
        summary: answer
            .map(|a| a.answer.clone())
            .unwrap_or_else(|| CANDIDATE_EVALUATION_PLACEHOLDER.to_string()),
    })
}

fn role_question(entry: &QuestionWithAnswers) -> Result<RoleQuestion, StoreError> {
    let answer = single_answer(entry)?;
    Ok(RoleQuestion {
        id: entry.question.question_id.to_string(),
        question: entry.question.question.clone(),
        status: QuestionStatus::from_answer(answer),
        summary: answer
            .map(|a| a.answer.clone())
            .unwrap_or_else(|| ROLE_QUESTION_PLACEHOLDER.to_string()),
    })
}

fn assemble(
    application: ApplicationRow,
    evaluation_questions: Vec<EvaluationQuestion>,
    role_questions: Vec<RoleQuestion>,
    documents: Vec<DocumentMetaRow>,
) -> CandidateEvaluationData {
    let metrics = ApplicationMetrics::from_row(&application);
    CandidateEvaluationData {
        candidate_id: application.application_id.to_string(),
        candidate_name: ranked_name(
            application.candidate_rank.as_deref(),
            &application.candidate_name,
        ),
        role_title: application.role_title,
        evaluation_sections: vec![EvaluationSection {
            id: EVALUATION_SECTION_ID.to_string(),
            title: EVALUATION_SECTION_TITLE.to_string(),
            questions: evaluation_questions,
        }],
        role_questions,
        application_data: ApplicationData {
            overall_rating: application.overall_rating,
            ai_summary: application.ai_summary.unwrap_or_default(),
            reviewer_comment: application.reviewer_comment.unwrap_or_default(),
            metrics,
            status: application.status,
        },
        documents,
    }
}
