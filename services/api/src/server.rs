use crate::cli::ServeArgs;
use crate::infra::{training_service, AppState, InMemoryProgressRepository};
use crate::routes::with_training_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sales_trainer::config::AppConfig;
use sales_trainer::error::AppError;
use sales_trainer::telemetry;
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

    let service = Arc::new(training_service(
        &config.training,
        InMemoryProgressRepository::default(),
    )?);
    let modules = service.catalog().modules().count();

    let app = with_training_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, modules, "sales training service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
