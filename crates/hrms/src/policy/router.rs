use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::collaborators::IdentityVerifier;
use crate::http::{authenticate, success};
use crate::store::HrStore;

use super::domain::PolicyDraft;
use super::service::{ListScope, PolicyService};

/// Shared state for the policy endpoints.
pub struct PolicyRouterState<S> {
    pub service: Arc<PolicyService<S>>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl<S> Clone for PolicyRouterState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            identity: self.identity.clone(),
        }
    }
}

/// Router builder exposing policy mutation, scoped listing, and the
/// effective-policy walk.
pub fn policy_router<S>(state: PolicyRouterState<S>) -> Router
where
    S: HrStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/company/policy",
            get(list_handler::<S>)
                .post(create_handler::<S>)
                .patch(update_handler::<S>),
        )
        .route(
            "/api/v1/company/policy/effective",
            get(effective_handler::<S>),
        )
        .with_state(state)
}

/// Accepts a single draft or a batch array in one endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreatePayload {
    One(PolicyDraft),
    Many(Vec<PolicyDraft>),
}

async fn create_handler<S>(
    State(state): State<PolicyRouterState<S>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<CreatePayload>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match payload {
        CreatePayload::One(draft) => match state.service.create(&ctx, &draft) {
            Ok(policy) => success(StatusCode::CREATED, policy),
            Err(err) => err.into_response(),
        },
        CreatePayload::Many(drafts) => match state.service.create_batch(&ctx, &drafts) {
            Ok(policies) => success(StatusCode::CREATED, policies),
            Err(err) => err.into_response(),
        },
    }
}

async fn update_handler<S>(
    State(state): State<PolicyRouterState<S>>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<PolicyDraft>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.update(&ctx, &patch) {
        Ok(policy) => success(StatusCode::OK, policy),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    scope: ListScope,
    #[serde(default)]
    scope_id: Option<Uuid>,
}

async fn list_handler<S>(
    State(state): State<PolicyRouterState<S>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.list(&ctx, params.scope, params.scope_id) {
        Ok(policies) => success(StatusCode::OK, policies),
        Err(err) => err.into_response(),
    }
}

async fn effective_handler<S>(
    State(state): State<PolicyRouterState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.resolve_effective(&ctx) {
        Ok(resolved) => {
            let mut body = Map::new();
            for (policy_type, policy) in resolved {
                let value = match policy {
                    Some(policy) => json!(policy),
                    None => Value::Null,
                };
                body.insert(policy_type.label().to_string(), value);
            }
            success(StatusCode::OK, Value::Object(body))
        }
        Err(err) => err.into_response(),
    }
}
