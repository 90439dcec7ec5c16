// HTTP handlers for member endpoints

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::member::{
    error::MemberError,
    extract::JsonBody,
    middleware::AuthenticatedMember,
    models::{MemberResponse, SignInRequest, SignUpRequest},
    session::bearer_header,
};
use crate::AppState;

/// Page the client is sent to after a successful registration
pub const REGISTER_COMPLETE_LOCATION: &str = "/member/register-complete";

/// Register a new member
/// POST /api/member/register
#[utoipa::path(
    post,
    path = "/api/member/register",
    request_body = SignUpRequest,
    responses(
        (status = 301, description = "Member registered, redirect to the completion page"),
        (status = 400, description = "Malformed body or invalid input data"),
        (status = 409, description = "Username already exists")
    ),
    tag = "member"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignUpRequest>,
) -> Result<(StatusCode, [(header::HeaderName, &'static str); 1]), MemberError> {
    let member = state.member_service.register(request).await?;
    tracing::debug!("Redirecting member {} to registration completion page", member.username);

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, REGISTER_COMPLETE_LOCATION)],
    ))
}

/// Log a member in
/// POST /api/member/login
///
/// The token is returned both as `Authorization: Bearer <token>` and as the
/// `X-AUTH-TOKEN` cookie.
#[utoipa::path(
    post,
    path = "/api/member/login",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Authenticated; token in Authorization header and X-AUTH-TOKEN cookie"),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Password does not match"),
        (status = 404, description = "Member does not exist")
    ),
    tag = "member"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignInRequest>,
) -> Result<(StatusCode, HeaderMap), MemberError> {
    let member = state.member_service.authenticate(request).await?;
    let token = state
        .token_service
        .generate_token(&member.username, &member.roles)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer_header(&token)?);
    headers.insert(
        header::SET_COOKIE,
        state
            .cookies
            .token_cookie(&token, state.token_service.ttl_seconds())?,
    );

    tracing::info!("Member {} logged in", member.username);
    Ok((StatusCode::OK, headers))
}

/// Log out and clear the token cookie
/// POST /api/member/logout
#[utoipa::path(
    post,
    path = "/api/member/logout",
    responses(
        (status = 200, description = "Logged out, X-AUTH-TOKEN cookie cleared", body = bool, example = json!(true))
    ),
    tag = "member"
)]
pub async fn logout_handler(State(state): State<AppState>) -> (HeaderMap, Json<bool>) {
    let result = state.member_service.logout();

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, state.cookies.clear_cookie());

    (headers, Json(result))
}

/// Get the currently authenticated member
/// GET /api/member/me
#[utoipa::path(
    get,
    path = "/api/member/me",
    responses(
        (status = 200, description = "Current member", body = MemberResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Member no longer exists")
    ),
    tag = "member"
)]
pub async fn me_handler(
    State(state): State<AppState>,
    member: AuthenticatedMember,
) -> Result<Json<MemberResponse>, MemberError> {
    let member = state
        .member_service
        .load_by_username(&member.username)
        .await?;

    Ok(Json(MemberResponse::from(member)))
}
