//! Moderator administration. Every route here sits behind the
//! moderator-only guard chain.

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
    dtos::{moderator::UpdateModeratorRequest, MessageResponse},
    middleware::CurrentPrincipal,
    models::{ModeratorStatus, ModeratorUpdate, PrincipalKind},
    utils::ValidatedJson,
    AppState,
};

#[utoipa::path(
    get,
    path = "/moderators",
    responses(
        (status = 200, description = "All moderators", body = [ModeratorResponse]),
        (status = 403, description = "Active moderator required", body = ErrorResponse)
    ),
    tag = "Moderators",
    security(("bearer_auth" = []))
)]
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.account_service.list_moderators().await?))
}

#[utoipa::path(
    get,
    path = "/moderators/{id}",
    params(("id" = Uuid, Path, description = "Moderator id")),
    responses(
        (status = 200, description = "Moderator", body = ModeratorResponse),
        (status = 404, description = "Moderator not found", body = ErrorResponse)
    ),
    tag = "Moderators",
    security(("bearer_auth" = []))
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.account_service.get_moderator(id).await?))
}

/// Update names, role or status
#[utoipa::path(
    patch,
    path = "/moderators/{id}",
    params(("id" = Uuid, Path, description = "Moderator id")),
    request_body = UpdateModeratorRequest,
    responses(
        (status = 200, description = "Moderator updated", body = ModeratorResponse),
        (status = 404, description = "Moderator not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Moderators",
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateModeratorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let moderator = state
        .account_service
        .update_moderator(id, req.into(), actor.id())
        .await?;
    Ok(Json(moderator))
}

async fn set_status(
    state: &AppState,
    actor: Uuid,
    id: Uuid,
    status: ModeratorStatus,
) -> Result<impl IntoResponse, AppError> {
    let moderator = state
        .account_service
        .update_moderator(id, ModeratorUpdate::status(status), actor)
        .await?;
    Ok(Json(moderator))
}

/// Set status ACTIVE
#[utoipa::path(
    patch,
    path = "/moderators/{id}/approve",
    params(("id" = Uuid, Path, description = "Moderator id")),
    responses(
        (status = 200, description = "Moderator approved", body = ModeratorResponse),
        (status = 404, description = "Moderator not found", body = ErrorResponse)
    ),
    tag = "Moderators",
    security(("bearer_auth" = []))
)]
pub async fn approve(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    set_status(&state, actor.id(), id, ModeratorStatus::Active).await
}

/// Set status INACTIVE
#[utoipa::path(
    patch,
    path = "/moderators/{id}/reject",
    params(("id" = Uuid, Path, description = "Moderator id")),
    responses(
        (status = 200, description = "Moderator rejected", body = ModeratorResponse),
        (status = 404, description = "Moderator not found", body = ErrorResponse)
    ),
    tag = "Moderators",
    security(("bearer_auth" = []))
)]
pub async fn reject(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    set_status(&state, actor.id(), id, ModeratorStatus::Inactive).await
}

/// Set status SUSPENDED. Existing tokens stop passing moderator guards on
/// the next request.
#[utoipa::path(
    patch,
    path = "/moderators/{id}/suspend",
    params(("id" = Uuid, Path, description = "Moderator id")),
    responses(
        (status = 200, description = "Moderator suspended", body = ModeratorResponse),
        (status = 404, description = "Moderator not found", body = ErrorResponse)
    ),
    tag = "Moderators",
    security(("bearer_auth" = []))
)]
pub async fn suspend(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    set_status(&state, actor.id(), id, ModeratorStatus::Suspended).await
}

#[utoipa::path(
    delete,
    path = "/moderators/{id}",
    params(("id" = Uuid, Path, description = "Moderator id")),
    responses(
        (status = 200, description = "Moderator deleted", body = MessageResponse),
        (status = 404, description = "Moderator not found", body = ErrorResponse)
    ),
    tag = "Moderators",
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .account_service
        .delete(PrincipalKind::Moderator, id)
        .await?;
    tracing::info!(moderator_id = %id, actor_id = %actor.id(), "Moderator removed");
    Ok(Json(MessageResponse {
        message: "Moderator deleted".to_string(),
    }))
}
