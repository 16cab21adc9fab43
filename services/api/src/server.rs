use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEvaluationRepository, InMemoryProgramRepository};
use crate::routes::with_grant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use grant_eval::config::AppConfig;
use grant_eval::error::AppError;
use grant_eval::telemetry;
use grant_eval::workflows::grants::GrantSelectionService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let programs = Arc::new(InMemoryProgramRepository::default());
    let evaluations = Arc::new(InMemoryEvaluationRepository::default());
    let selection_service = Arc::new(GrantSelectionService::new(
        programs,
        evaluations,
        config.selection,
    ));

    let app = with_grant_routes(selection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_scale = %config.selection.default_scale,
        "grant selection service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
