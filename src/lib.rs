pub mod config;
pub mod db;
pub mod member;
pub mod validation;

use axum::{
    extract::FromRef,
    http::header,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use member::{
    handlers::{login_handler, logout_handler, me_handler, register_handler},
    CookieSettings, MemberResponse, MemberService, MemberStore, Role, SignInRequest,
    SignUpRequest, TokenService,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        member::handlers::register_handler,
        member::handlers::login_handler,
        member::handlers::logout_handler,
        member::handlers::me_handler,
    ),
    components(
        schemas(SignUpRequest, SignInRequest, MemberResponse, Role)
    ),
    tags(
        (name = "member", description = "Member registration, login and logout")
    ),
    info(
        title = "Community Member API",
        version = "0.1.0",
        description = "Member accounts with password authentication and bearer tokens"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub member_service: Arc<MemberService>,
    pub token_service: Arc<TokenService>,
    pub cookies: CookieSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn MemberStore>, token_service: TokenService, cookies: CookieSettings) -> Self {
        Self {
            member_service: Arc::new(MemberService::new(store)),
            token_service: Arc::new(token_service),
            cookies,
        }
    }

    /// Build the state for a store using the token and cookie settings in `config`
    pub fn from_config(store: Arc<dyn MemberStore>, config: &Config) -> Self {
        Self::new(
            store,
            TokenService::with_ttl(&config.jwt_secret, config.token_ttl_seconds),
            CookieSettings {
                secure: config.cookie_secure,
            },
        )
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.token_service.clone()
    }
}

/// Creates and configures the application router
/// Member endpoints live under /api/member
pub fn create_router(state: AppState) -> Router {
    // The token travels back in the Authorization header, so browsers must be allowed to read it
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::AUTHORIZATION]);

    let member_routes = Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/me", get(me_handler));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/member", member_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
