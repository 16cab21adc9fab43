use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicationId, CriterionId, Evaluation, GrantProgramId, QuestionId};
use super::eligibility::{check_eligibility, AnswerValue, EligibilityReport, EligibilityRule};
use super::repository::{EvaluationRepository, ProgramRepository, RepositoryError};
use super::scoring::RankedApplication;
use super::service::{CriterionDraft, GrantSelectionService, NewGrantProgram, SelectionServiceError};

/// Applicant answers checked against a rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCheckRequest {
    pub rules: Vec<EligibilityRule>,
    #[serde(default)]
    pub answers: BTreeMap<QuestionId, AnswerValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightUpdate {
    pub weight: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingView {
    pub program_id: GrantProgramId,
    pub applications: Vec<RankedApplication>,
}

/// Router builder exposing eligibility checks, criteria editing, evaluation intake, and scoring.
pub fn grant_router<P, E>(service: Arc<GrantSelectionService<P, E>>) -> Router
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/check", post(eligibility_handler))
        .route("/api/v1/grant-programs", post(create_program_handler::<P, E>))
        .route(
            "/api/v1/grant-programs/:program_id",
            get(program_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/criteria",
            post(add_criterion_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/criteria/redistribute",
            post(redistribute_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/criteria/:criterion_id",
            delete(remove_criterion_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/criteria/:criterion_id/weight",
            put(set_weight_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/publish",
            post(publish_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/evaluations",
            post(record_evaluation_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/applications/:application_id/score",
            get(score_handler::<P, E>),
        )
        .route(
            "/api/v1/grant-programs/:program_id/ranking",
            get(ranking_handler::<P, E>),
        )
        .with_state(service)
}

pub(crate) async fn eligibility_handler(
    axum::Json(request): axum::Json<EligibilityCheckRequest>,
) -> axum::Json<EligibilityReport> {
    axum::Json(check_eligibility(&request.rules, &request.answers))
}

pub(crate) async fn create_program_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    axum::Json(request): axum::Json<NewGrantProgram>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(StatusCode::CREATED, service.create_program(request))
}

pub(crate) async fn program_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path(program_id): Path<String>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(StatusCode::OK, service.program(&GrantProgramId(program_id)))
}

pub(crate) async fn add_criterion_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path(program_id): Path<String>,
    axum::Json(draft): axum::Json<CriterionDraft>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.add_criterion(&GrantProgramId(program_id), draft),
    )
}

pub(crate) async fn redistribute_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path(program_id): Path<String>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.redistribute_weights(&GrantProgramId(program_id)),
    )
}

pub(crate) async fn remove_criterion_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path((program_id, criterion_id)): Path<(String, String)>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.remove_criterion(&GrantProgramId(program_id), &CriterionId(criterion_id)),
    )
}

pub(crate) async fn set_weight_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path((program_id, criterion_id)): Path<(String, String)>,
    axum::Json(update): axum::Json<WeightUpdate>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.set_weight(
            &GrantProgramId(program_id),
            &CriterionId(criterion_id),
            update.weight,
        ),
    )
}

pub(crate) async fn publish_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path(program_id): Path<String>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(StatusCode::OK, service.publish(&GrantProgramId(program_id)))
}

pub(crate) async fn record_evaluation_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path(program_id): Path<String>,
    axum::Json(evaluation): axum::Json<Evaluation>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.record_evaluation(&GrantProgramId(program_id), evaluation),
    )
}

pub(crate) async fn score_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path((program_id, application_id)): Path<(String, String)>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.marking_score(&GrantProgramId(program_id), &ApplicationId(application_id)),
    )
}

pub(crate) async fn ranking_handler<P, E>(
    State(service): State<Arc<GrantSelectionService<P, E>>>,
    Path(program_id): Path<String>,
) -> Response
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    let program_id = GrantProgramId(program_id);
    let ranking = service.ranking(&program_id).map(|applications| RankingView {
        program_id,
        applications,
    });
    respond(StatusCode::OK, ranking)
}

fn respond<T: Serialize>(
    success: StatusCode,
    result: Result<T, SelectionServiceError>,
) -> Response {
    match result {
        Ok(body) => (success, axum::Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: SelectionServiceError) -> Response {
    let status = match &error {
        SelectionServiceError::ProgramNotFound(_)
        | SelectionServiceError::CriterionNotFound(_)
        | SelectionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SelectionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        SelectionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SelectionServiceError::ProgramLocked(_)
        | SelectionServiceError::ProgramNotPublished(_)
        | SelectionServiceError::MissingQuestion
        | SelectionServiceError::UnknownQuestion(_)
        | SelectionServiceError::ScoreOutOfRange { .. }
        | SelectionServiceError::Criteria(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
