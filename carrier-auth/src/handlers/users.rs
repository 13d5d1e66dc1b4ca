use service_core::{
    axum::{extract::State, response::IntoResponse, Json},
    error::AppError,
};

use crate::{
    dtos::{profile::CompleteUserProfileRequest, MessageResponse},
    middleware::CurrentPrincipal,
    models::{Principal, PrincipalKind, UserResponse},
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

fn as_user(principal: Principal) -> Result<UserResponse, ServiceError> {
    match principal {
        Principal::User(user) => Ok(user),
        _ => Err(ServiceError::WrongPrincipalType(PrincipalKind::User)),
    }
}

/// Current user profile
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not a user token", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(as_user(principal)?))
}

/// Set the user's names and mark the profile COMPLETE
#[utoipa::path(
    patch,
    path = "/users/complete-profile",
    request_body = CompleteUserProfileRequest,
    responses(
        (status = 200, description = "Profile completed", body = UserResponse),
        (status = 401, description = "Not a user token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn complete_profile(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ValidatedJson(req): ValidatedJson<CompleteUserProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = as_user(principal)?;
    let updated = state
        .account_service
        .complete_user_profile(user.id, &req.first_name, &req.last_name)
        .await?;
    Ok(Json(updated))
}

/// Delete the caller's user account
#[utoipa::path(
    delete,
    path = "/users/me",
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Not a user token", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, AppError> {
    let user = as_user(principal)?;
    state
        .account_service
        .delete(PrincipalKind::User, user.id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Account deleted".to_string(),
    }))
}
