use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use serde::Deserialize;

use crate::auth::collaborators::IdentityVerifier;
use crate::http::{authenticate, success};
use crate::store::HrStore;

use super::domain::{
    CreateCompany, CreateDepartment, CreateEmployee, DepartmentId, UpdateCompany,
};
use super::service::DirectoryService;

/// Shared state for the company/department/employee endpoints.
pub struct DirectoryRouterState<S> {
    pub service: Arc<DirectoryService<S>>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl<S> Clone for DirectoryRouterState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            identity: self.identity.clone(),
        }
    }
}

pub fn directory_router<S>(state: DirectoryRouterState<S>) -> Router
where
    S: HrStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/company/details",
            post(provision_company_handler::<S>).patch(update_company_handler::<S>),
        )
        .route(
            "/api/v1/department",
            post(create_department_handler::<S>)
                .get(list_departments_handler::<S>)
                .delete(delete_department_handler::<S>),
        )
        .route("/api/v1/employee", post(create_employee_handler::<S>))
        .with_state(state)
}

async fn provision_company_handler<S>(
    State(state): State<DirectoryRouterState<S>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<CreateCompany>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.provision_company(&ctx, input) {
        Ok(company) => success(StatusCode::CREATED, company),
        Err(err) => err.into_response(),
    }
}

async fn update_company_handler<S>(
    State(state): State<DirectoryRouterState<S>>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<UpdateCompany>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.update_company(&ctx, patch) {
        Ok(company) => success(StatusCode::OK, company),
        Err(err) => err.into_response(),
    }
}

async fn create_department_handler<S>(
    State(state): State<DirectoryRouterState<S>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<CreateDepartment>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.create_department(&ctx, input) {
        Ok(department) => success(StatusCode::CREATED, department),
        Err(err) => err.into_response(),
    }
}

async fn list_departments_handler<S>(
    State(state): State<DirectoryRouterState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.list_departments(&ctx) {
        Ok(departments) => success(StatusCode::OK, departments),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct DeleteDepartment {
    department_id: DepartmentId,
}

async fn delete_department_handler<S>(
    State(state): State<DirectoryRouterState<S>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<DeleteDepartment>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.delete_department(&ctx, input.department_id) {
        Ok(()) => success(
            StatusCode::OK,
            serde_json::json!({ "message": "department deleted" }),
        ),
        Err(err) => err.into_response(),
    }
}

async fn create_employee_handler<S>(
    State(state): State<DirectoryRouterState<S>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<CreateEmployee>,
) -> Response
where
    S: HrStore + 'static,
{
    let ctx = match authenticate(&headers, state.identity.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.service.create_employee(&ctx, input) {
        Ok(employee) => success(StatusCode::CREATED, employee),
        Err(err) => err.into_response(),
    }
}
