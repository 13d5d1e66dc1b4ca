pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use service_core::axum::{
    extract::State,
    http::{header, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{openapi::Server, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AuthConfig, Environment, SwaggerMode};
use crate::middleware::{
    auth_middleware, require_guards, GuardChain, COMPANY_ONLY, MODERATOR_ONLY, USER_ONLY,
};
use crate::services::{
    AccountService, AuthService, CredentialStore, JwtService, PrincipalResolver, ServiceError,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::registration::register,
        handlers::auth::registration::company_register,
        handlers::auth::registration::moderator_register,
        handlers::auth::session::login,
        handlers::auth::session::company_login,
        handlers::auth::session::moderator_login,
        handlers::auth::session::profile,
        handlers::users::get_me,
        handlers::users::complete_profile,
        handlers::users::delete_me,
        handlers::companies::get_me,
        handlers::companies::complete_profile,
        handlers::companies::delete_me,
        handlers::companies::verify,
        handlers::moderators::list,
        handlers::moderators::get,
        handlers::moderators::update,
        handlers::moderators::approve,
        handlers::moderators::reject,
        handlers::moderators::suspend,
        handlers::moderators::delete,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::MessageResponse,
            dtos::auth::LoginRequest,
            dtos::auth::RegisterUserRequest,
            dtos::auth::RegisterCompanyRequest,
            dtos::auth::RegisterModeratorRequest,
            dtos::auth::AuthResponse,
            dtos::profile::CompleteUserProfileRequest,
            dtos::profile::CompleteCompanyProfileRequest,
            dtos::moderator::UpdateModeratorRequest,
            models::UserResponse,
            models::CompanyResponse,
            models::ModeratorResponse,
            models::ProfileStatus,
            models::RegistrationStatus,
            models::ModeratorRole,
            models::ModeratorStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and the current principal"),
        (name = "Registration", description = "User, company and moderator sign-up"),
        (name = "Users", description = "User profile management"),
        (name = "Companies", description = "Company profile and verification"),
        (name = "Moderators", description = "Moderator administration"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI document with the API prefix as its server base path.
pub fn openapi_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let base = if api_prefix.is_empty() { "/" } else { api_prefix };
    doc.servers = Some(vec![Server::new(base)]);
    doc
}

#[derive(Clone)]
pub struct AppState {
    pub config: AuthConfig,
    pub store: Arc<dyn CredentialStore>,
    pub jwt: JwtService,
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub resolver: PrincipalResolver,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
    pub ip_rate_limiter: IpRateLimiter,
}

impl AppState {
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let auth_service = AuthService::new(store.clone(), jwt.clone());
        let resolver = PrincipalResolver::new(auth_service.clone());
        let account_service = AccountService::new(store.clone());

        let limits = &config.rate_limit;
        let login_rate_limiter =
            create_ip_rate_limiter(limits.login_attempts, limits.login_window_seconds);
        let register_rate_limiter =
            create_ip_rate_limiter(limits.register_attempts, limits.register_window_seconds);
        let ip_rate_limiter =
            create_ip_rate_limiter(limits.global_ip_limit, limits.global_ip_window_seconds);

        Self {
            config,
            store,
            jwt,
            auth_service,
            account_service,
            resolver,
            login_rate_limiter,
            register_rate_limiter,
            ip_rate_limiter,
        }
    }
}

/// Routes behind `auth_middleware` and then `chain`. The auth layer is added
/// last so it runs first.
fn guarded(routes: Router<AppState>, state: &AppState, chain: GuardChain) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(chain, require_guards))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

fn api_routes(state: &AppState) -> Router<AppState> {
    let login_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/company/login", post(handlers::auth::company_login))
        .route("/auth/moderator/login", post(handlers::auth::moderator_login))
        .route_layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let register_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/company/register", post(handlers::auth::company_register))
        .route(
            "/auth/moderator/register",
            post(handlers::auth::moderator_register),
        )
        .route_layer(from_fn_with_state(
            state.register_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    // Token check only; any principal type.
    let profile_routes = Router::new()
        .route("/auth/profile", get(handlers::auth::profile))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let user_routes = guarded(
        Router::new()
            .route(
                "/users/me",
                get(handlers::users::get_me).delete(handlers::users::delete_me),
            )
            .route(
                "/users/complete-profile",
                patch(handlers::users::complete_profile),
            ),
        state,
        USER_ONLY,
    );

    let company_routes = guarded(
        Router::new()
            .route(
                "/companies/me",
                get(handlers::companies::get_me).delete(handlers::companies::delete_me),
            )
            .route(
                "/companies/complete-profile",
                patch(handlers::companies::complete_profile),
            ),
        state,
        COMPANY_ONLY,
    );

    let moderator_routes = guarded(
        Router::new()
            .route("/companies/verify/:id", post(handlers::companies::verify))
            .route("/moderators", get(handlers::moderators::list))
            .route(
                "/moderators/:id",
                get(handlers::moderators::get)
                    .patch(handlers::moderators::update)
                    .delete(handlers::moderators::delete),
            )
            .route(
                "/moderators/:id/approve",
                patch(handlers::moderators::approve),
            )
            .route("/moderators/:id/reject", patch(handlers::moderators::reject))
            .route(
                "/moderators/:id/suspend",
                patch(handlers::moderators::suspend),
            ),
        state,
        MODERATOR_ONLY,
    );

    Router::new()
        .merge(login_routes)
        .merge(register_routes)
        .merge(profile_routes)
        .merge(user_routes)
        .merge(company_routes)
        .merge(moderator_routes)
}

fn cors_layer(config: &AuthConfig) -> CorsLayer {
    let origins = &config.security.allowed_origins;
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| tracing::error!(origin = %o, error = %e, "Ignoring invalid CORS origin"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics));

    let doc = openapi_doc(&state.config.api_prefix);
    let swagger_enabled = match state.config.environment {
        Environment::Dev => true,
        Environment::Prod => state.config.swagger.enabled == SwaggerMode::Public,
    };

    if swagger_enabled {
        app = app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", doc));
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(move || {
                let doc = doc.clone();
                async move { Json(doc) }
            }),
        );
    }

    let api = api_routes(&state);
    let app = if state.config.api_prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(&state.config.api_prefix, api)
    };

    app.with_state(state.clone())
        .layer(from_fn_with_state(
            state.ip_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config))
}

/// Liveness plus a credential store round trip.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Credential store health check failed");
        ServiceError::Store(e)
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "credential_store": "up"
        }
    })))
}
