use service_core::{
    axum::{extract::State, http::StatusCode, response::IntoResponse, Json},
    error::AppError,
};

use crate::{
    dtos::auth::{RegisterCompanyRequest, RegisterModeratorRequest, RegisterUserRequest},
    services::NewPrincipal,
    utils::ValidatedJson,
    AppState,
};

/// Register a user. The profile starts INITIAL.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.auth_service.register(NewPrincipal::User(req)).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

/// Register a company. Registration starts INITIAL and unverified.
#[utoipa::path(
    post,
    path = "/auth/company/register",
    request_body = RegisterCompanyRequest,
    responses(
        (status = 201, description = "Company registered", body = AuthResponse),
        (status = 409, description = "Company already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn company_register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterCompanyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state
        .auth_service
        .register(NewPrincipal::Company(req))
        .await?;
    Ok((StatusCode::CREATED, Json(res)))
}

/// Register a moderator. New moderators are ACTIVE with role CONTENT_MOD.
#[utoipa::path(
    post,
    path = "/auth/moderator/register",
    request_body = RegisterModeratorRequest,
    responses(
        (status = 201, description = "Moderator registered", body = AuthResponse),
        (status = 409, description = "Moderator already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn moderator_register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterModeratorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state
        .auth_service
        .register(NewPrincipal::Moderator(req))
        .await?;
    Ok((StatusCode::CREATED, Json(res)))
}
