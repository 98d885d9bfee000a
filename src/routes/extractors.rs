// ============================================================================
// Axum Extractors
// ============================================================================
//
// Custom extractors for Axum routes:
// - Session: Resolves the bearer token from the session cookie
// - UuidPath: The `:id` path segment, checked to be a canonical UUID
// - ValidJson / ValidForm: Bodies whose rejections become validation errors
//
// Handlers list `Session` before any input extractor, so an unauthenticated
// request is rejected before its input is looked at.
//
// ============================================================================

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::AppError;
use crate::session::{BearerToken, require_session};
use crate::validation::parse_uuid;

/// Extractor for the caller's upstream bearer token
///
/// Usage:
/// ```rust,ignore
/// async fn handler(State(ctx): State<Arc<AppContext>>, Session(token): Session) -> ... {
///     ctx.platform.me(&token).await
/// }
/// ```
#[derive(Debug)]
pub struct Session(pub BearerToken);

#[async_trait]
impl FromRequestParts<Arc<AppContext>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        require_session(&state.config, &parts.headers).map(Session)
    }
}

/// Path extractor for routes shaped `/.../:id`
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(format!("id: {}", rejection.body_text())))?;
        parse_uuid("id", &raw).map(UuidPath)
    }
}

/// JSON body extractor rejecting with a validation error
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::validation(format!("body: {}", rejection.body_text()))
            })?;
        Ok(ValidJson(value))
    }
}

/// Url-encoded form extractor rejecting with a validation error
#[derive(Debug)]
pub struct ValidForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::validation(format!("form: {}", rejection.body_text()))
            })?;
        Ok(ValidForm(value))
    }
}
