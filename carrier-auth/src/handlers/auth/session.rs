use service_core::{
    axum::{
        extract::State,
        response::{IntoResponse, Response},
        Json,
    },
    error::AppError,
};

use crate::{
    dtos::auth::LoginRequest, middleware::CurrentPrincipal, models::PrincipalKind,
    utils::ValidatedJson, AppState,
};

/// User login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.auth_service.login(PrincipalKind::User, &req).await?;
    Ok(Json(res))
}

/// Company login with work email and password
#[utoipa::path(
    post,
    path = "/auth/company/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn company_login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state
        .auth_service
        .login(PrincipalKind::Company, &req)
        .await?;
    Ok(Json(res))
}

/// Moderator login. Only ACTIVE moderators can log in.
#[utoipa::path(
    post,
    path = "/auth/moderator/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn moderator_login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state
        .auth_service
        .login(PrincipalKind::Moderator, &req)
        .await?;
    Ok(Json(res))
}

/// The resolved principal behind the bearer token, with its `isCompany`
/// or `isModerator` flag.
#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Current principal"),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile(CurrentPrincipal(principal): CurrentPrincipal) -> Response {
    Json(principal.with_flags()).into_response()
}
