use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use grant_eval::error::AppError;
use grant_eval::workflows::grants::{
    grant_router, rank_applications, total_weight, EvaluationCsvImporter, EvaluationIndex,
    EvaluationRepository, EvaluationScale, GrantSelectionService, ProgramRepository,
    RankedApplication, SelectionCriterion,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Criteria and a CSV evaluation export ranked without touching stored programs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkingPreviewRequest {
    pub(crate) criteria: Vec<SelectionCriterion>,
    pub(crate) evaluations_csv: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkingPreviewResponse {
    pub(crate) evaluation_scale: EvaluationScale,
    pub(crate) total_weight: u32,
    pub(crate) imported_evaluations: usize,
    pub(crate) applications: Vec<RankedApplication>,
}

pub(crate) fn with_grant_routes<P, E>(service: Arc<GrantSelectionService<P, E>>) -> axum::Router
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    grant_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/marking/preview",
            axum::routing::post(marking_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn marking_preview_endpoint(
    Json(payload): Json<MarkingPreviewRequest>,
) -> Result<Json<MarkingPreviewResponse>, AppError> {
    let MarkingPreviewRequest {
        criteria,
        evaluations_csv,
    } = payload;

    let evaluation_scale = criteria
        .first()
        .map(|criterion| criterion.evaluation_scale)
        .unwrap_or_default();
    let reader = Cursor::new(evaluations_csv.into_bytes());
    let evaluations = EvaluationCsvImporter::new(evaluation_scale).from_reader(reader)?;
    let imported_evaluations = evaluations.len();
    let index = EvaluationIndex::from_evaluations(evaluations);

    Ok(Json(MarkingPreviewResponse {
        evaluation_scale,
        total_weight: total_weight(&criteria),
        imported_evaluations,
        applications: rank_applications(&criteria, &index),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use grant_eval::workflows::grants::{GrantProgramId, QuestionId};

    fn criterion(question: &str, weight: u8) -> SelectionCriterion {
        let mut criterion = SelectionCriterion::new(GrantProgramId::new("gp-preview"), question);
        criterion.question_id = Some(QuestionId::new(question));
        criterion.weight = weight;
        criterion
    }

    #[tokio::test]
    async fn marking_preview_ranks_inline_exports() {
        let request = MarkingPreviewRequest {
            criteria: vec![criterion("q-impact", 60), criterion("q-budget", 40)],
            evaluations_csv: "Application ID,Question ID,Question Group ID,Value\n\
app-1,q-impact,,80\napp-1,q-budget,,50\napp-2,q-impact,,100\n"
                .to_string(),
        };

        let Json(body) = marking_preview_endpoint(Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.evaluation_scale, EvaluationScale::Hundred);
        assert_eq!(body.total_weight, 100);
        assert_eq!(body.imported_evaluations, 3);
        assert_eq!(body.applications[0].application_id.as_str(), "app-1");
        assert!((body.applications[0].total_score - 68.0).abs() < 1e-9);
        assert!((body.applications[1].total_score - 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn marking_preview_rejects_malformed_exports() {
        let request = MarkingPreviewRequest {
            criteria: vec![criterion("q-impact", 100)],
            evaluations_csv: "Application ID,Question ID,Question Group ID,Value\n\
app-1,,,80\n"
                .to_string(),
        };

        let error = marking_preview_endpoint(Json(request))
            .await
            .expect_err("row without a question is rejected");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn marking_preview_rejects_scores_outside_the_scale() {
        let request = MarkingPreviewRequest {
            criteria: vec![criterion("q-impact", 100)],
            evaluations_csv: "Application ID,Question ID,Question Group ID,Value\n\
app-1,q-impact,,500\n"
                .to_string(),
        };

        let error = marking_preview_endpoint(Json(request))
            .await
            .expect_err("score above 100 is rejected");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reflects_the_startup_flag() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            metrics: Arc::new(recorder.handle()),
        };

        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
