use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use hrms::auth::otp::OtpCache;
use hrms::auth::service::AuthService;
use hrms::config::AppConfig;
use hrms::directory::service::DirectoryService;
use hrms::error::AppError;
use hrms::policy::service::PolicyService;
use hrms::store::InMemoryHrStore;
use hrms::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, LocalGoogleVerifier, LocalTokenService, LogNotifier, PlainCredentialVault,
};
use crate::routes::{with_api_routes, ApiServices};

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

    let store = Arc::new(InMemoryHrStore::new());
    let tokens = Arc::new(LocalTokenService::new(store.clone()));
    let auth = Arc::new(AuthService::new(
        store.clone(),
        tokens.clone(),
        Arc::new(LocalGoogleVerifier),
        Arc::new(PlainCredentialVault),
        Arc::new(LogNotifier),
        Arc::new(OtpCache::with_ttl(config.auth.otp_ttl())),
    ));
    let directory = Arc::new(DirectoryService::new(store.clone()));
    let policy = Arc::new(PolicyService::new(store));

    let app = with_api_routes(ApiServices {
        auth,
        directory,
        policy,
        identity: tokens,
    })
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hr management service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
