//! Authorization gate: bearer header -> verified token -> stored actor -> role.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use praise_types::models::{Role, Teacher};

use crate::error::ApiError;
use crate::state::{AppState, blocking};

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// A missing header and a malformed one are the same failure: the value must
/// be exactly two whitespace-separated parts with a case-insensitive `bearer`
/// scheme.
pub fn bearer_token(header: Option<&str>) -> Result<&str, ApiError> {
    const NOT_AUTHENTICATED: ApiError = ApiError::Unauthorized("Not authenticated");

    let value = header.ok_or(NOT_AUTHENTICATED)?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(NOT_AUTHENTICATED),
    }
}

/// Resolve the acting teacher from request headers.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Teacher, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default());
    let token = bearer_token(header)?;
    let teacher_id = state.tokens.verify(token)?;

    blocking(state, move |s| {
        s.db.get_teacher_by_id(&teacher_id)?
            .map(|row| row.to_public())
            .ok_or_else(|| {
                warn!("Token subject {} no longer exists", teacher_id);
                ApiError::Unauthorized("Could not validate credentials")
            })
    })
    .await
}

pub fn require_role(actor: &Teacher, role: Role) -> Result<(), ApiError> {
    if actor.role != role {
        warn!("{} ({}) denied: requires {} role", actor.username, actor.role, role);
        return Err(ApiError::Forbidden("Administrator privileges required"));
    }
    Ok(())
}

/// Authenticate the request and store the actor as a `Teacher` extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

/// Must be layered inside `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let actor = req
        .extensions()
        .get::<Teacher>()
        .ok_or(ApiError::Unauthorized("Not authenticated"))?;
    require_role(actor, Role::Admin)?;
    Ok(next.run(req).await)
}
