use service_core::{
    axum::{
        extract::{Path, State},
        response::IntoResponse,
        Json,
    },
    error::AppError,
};
use uuid::Uuid;

use crate::{
    dtos::{profile::CompleteCompanyProfileRequest, MessageResponse},
    middleware::CurrentPrincipal,
    models::{CompanyResponse, Principal, PrincipalKind},
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

fn as_company(principal: Principal) -> Result<CompanyResponse, ServiceError> {
    match principal {
        Principal::Company(company) => Ok(company),
        _ => Err(ServiceError::WrongPrincipalType(PrincipalKind::Company)),
    }
}

/// Current company profile
#[utoipa::path(
    get,
    path = "/companies/me",
    responses(
        (status = 200, description = "Current company", body = CompanyResponse),
        (status = 401, description = "Not a company token", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(as_company(principal)?))
}

/// Set the company name and mark registration COMPLETE. A VERIFIED company
/// stays VERIFIED.
#[utoipa::path(
    patch,
    path = "/companies/complete-profile",
    request_body = CompleteCompanyProfileRequest,
    responses(
        (status = 200, description = "Profile completed", body = CompanyResponse),
        (status = 401, description = "Not a company token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn complete_profile(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ValidatedJson(req): ValidatedJson<CompleteCompanyProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let company = as_company(principal)?;
    let updated = state
        .account_service
        .complete_company_profile(company.id, &req.name)
        .await?;
    Ok(Json(updated))
}

/// Delete the caller's company account
#[utoipa::path(
    delete,
    path = "/companies/me",
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Not a company token", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, AppError> {
    let company = as_company(principal)?;
    state
        .account_service
        .delete(PrincipalKind::Company, company.id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Account deleted".to_string(),
    }))
}

/// Mark a company VERIFIED (moderators only)
#[utoipa::path(
    post,
    path = "/companies/verify/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company verified", body = CompanyResponse),
        (status = 403, description = "Active moderator required", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn verify(
    State(state): State<AppState>,
    CurrentPrincipal(moderator): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company = state
        .account_service
        .verify_company(id, moderator.id())
        .await?;
    Ok(Json(company))
}
