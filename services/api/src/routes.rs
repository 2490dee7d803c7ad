use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use hrms::auth::collaborators::IdentityVerifier;
use hrms::auth::router::{auth_router, AuthRouterState};
use hrms::auth::service::AuthService;
use hrms::directory::router::{directory_router, DirectoryRouterState};
use hrms::directory::service::DirectoryService;
use hrms::policy::router::{policy_router, PolicyRouterState};
use hrms::policy::service::PolicyService;
use hrms::store::InMemoryHrStore;

use crate::infra::AppState;

/// Everything the HTTP surface needs, wired once in the server bootstrap.
pub(crate) struct ApiServices {
    pub(crate) auth: Arc<AuthService<InMemoryHrStore>>,
    pub(crate) directory: Arc<DirectoryService<InMemoryHrStore>>,
    pub(crate) policy: Arc<PolicyService<InMemoryHrStore>>,
    pub(crate) identity: Arc<dyn IdentityVerifier>,
}

pub(crate) fn with_api_routes(services: ApiServices) -> axum::Router {
    let ApiServices {
        auth,
        directory,
        policy,
        identity,
    } = services;

    auth_router(AuthRouterState {
        auth,
        directory: directory.clone(),
        identity: identity.clone(),
    })
    .merge(directory_router(DirectoryRouterState {
        service: directory,
        identity: identity.clone(),
    }))
    .merge(policy_router(PolicyRouterState {
        service: policy,
        identity,
    }))
    .route("/health", axum::routing::get(healthcheck))
    .route("/ready", axum::routing::get(readiness_endpoint))
    .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    use hrms::auth::otp::OtpCache;
    use crate::infra::{LocalGoogleVerifier, LocalTokenService, LogNotifier, PlainCredentialVault};

    fn test_router() -> axum::Router {
        let store = Arc::new(InMemoryHrStore::new());
        let tokens = Arc::new(LocalTokenService::new(store.clone()));
        let auth = Arc::new(AuthService::new(
            store.clone(),
            tokens.clone(),
            Arc::new(LocalGoogleVerifier),
            Arc::new(PlainCredentialVault),
            Arc::new(LogNotifier),
            Arc::new(OtpCache::new()),
        ));
        let directory = Arc::new(DirectoryService::new(store.clone()));
        let policy = Arc::new(PolicyService::new(store));
        with_api_routes(ApiServices {
            auth,
            directory,
            policy,
            identity: tokens,
        })
    }

    #[tokio::test]
    async fn healthcheck_always_answers_ok() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let flag = Arc::new(AtomicBool::new(false));

        let state = Extension(AppState {
            readiness: flag.clone(),
            metrics: Arc::new(
                metrics_exporter_prometheus::PrometheusBuilder::new()
                    .install_recorder()
                    .expect("recorder"),
            ),
        });

        let response = readiness_endpoint(state.clone()).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        flag.store(true, Ordering::Release);
        let response = readiness_endpoint(state).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn google_sign_in_works_with_the_local_verifier() {
        let body = serde_json::json!({
            "id_token": serde_json::json!({
                "uid": "local-uid",
                "email": "dev@local.example",
                "name": "Dev User",
            })
            .to_string(),
        });
        let response = test_router()
            .oneshot(
                Request::post("/api/v1/auth/google")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
