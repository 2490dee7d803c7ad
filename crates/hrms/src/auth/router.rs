use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use crate::directory::domain::CompanyId;
use crate::directory::service::DirectoryService;
use crate::http::{authenticate, success};
use crate::store::HrStore;

use super::collaborators::IdentityVerifier;
use super::domain::UserId;
use super::service::AuthService;

/// Shared state for the authentication endpoints.
pub struct AuthRouterState<S> {
    pub auth: Arc<AuthService<S>>,
    pub directory: Arc<DirectoryService<S>>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl<S> Clone for AuthRouterState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            directory: self.directory.clone(),
            identity: self.identity.clone(),
        }
    }
}

pub fn auth_router<S>(state: AuthRouterState<S>) -> Router
where
    S: HrStore + 'static,
{
    Router::new()
        .route("/api/v1/auth/login", post(login_handler::<S>))
        .route("/api/v1/auth/google", post(google_login_handler::<S>))
        .route("/api/v1/auth/password", post(update_password_handler::<S>))
        .route(
            "/api/v1/auth/password/reset",
            post(request_reset_handler::<S>),
        )
        .route(
            "/api/v1/auth/password/reset/confirm",
            post(confirm_reset_handler::<S>),
        )
        .route("/api/v1/auth/user", delete(delete_user_handler::<S>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LoginInput {
    username: String,
    password: String,
}

async fn login_handler<S>(
    State(state): State<AuthRouterState<S>>,
    axum::Json(input): axum::Json<LoginInput>,
) -> Response
where
    S: HrStore + 'static,
{
    match state.auth.login(&input.username, &input.password) {
        Ok(output) => success(StatusCode::OK, output),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct GoogleLoginInput {
    id_token: String,
}

async fn google_login_handler<S>(
    State(state): State<AuthRouterState<S>>,
    axum::Json(input): axum::Json<GoogleLoginInput>,
) -> Response
where
    S: HrStore + 'static,
{
    match state.auth.google_login(&input.id_token) {
        Ok(output) => success(StatusCode::OK, output),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct UpdatePasswordInput {
    username: String,
    old_password: String,
    new_password: String,
}

async fn update_password_handler<S>(
    State(state): State<AuthRouterState<S>>,
    axum::Json(input): axum::Json<UpdatePasswordInput>,
) -> Response
where
    S: HrStore + 'static,
{
    match state
        .auth
        .update_password(&input.username, &input.old_password, &input.new_password)
    {
        Ok(()) => success(StatusCode::OK, json!({"message": "password updated"})),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct RequestResetInput {
    email: String,
    company_id: CompanyId,
}

async fn request_reset_handler<S>(
    State(state): State<AuthRouterState<S>>,
    axum::Json(input): axum::Json<RequestResetInput>,
) -> Response
where
    S: HrStore + 'static,
{
    match state
        .auth
        .request_password_reset(&input.email, input.company_id)
    {
        Ok(user_id) => success(
            StatusCode::OK,
            json!({"message": "OTP sent to your email", "user_id": user_id}),
        ),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ConfirmResetInput {
    user_id: UserId,
    email: String,
    otp: String,
    new_password: String,
}

async fn confirm_reset_handler<S>(
    State(state): State<AuthRouterState<S>>,
    axum::Json(input): axum::Json<ConfirmResetInput>,
) -> Response
where
    S: HrStore + 'static,
{
    match state.auth.confirm_password_reset(
        input.user_id,
        &input.email,
        &input.otp,
        &input.new_password,
    ) {
        Ok(()) => success(StatusCode::OK, json!({"message": "password reset successful"})),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct DeleteUserInput {
    employee_code: String,
}

async fn delete_user_handler<S>(
    State(state): State<AuthRouterState<S>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<DeleteUserInput>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.directory.delete_employee(&ctx, &input.employee_code) {
        Ok(()) => success(StatusCode::OK, json!({"message": "employee deleted"})),
        Err(err) => err.into_response(),
    }
}
