use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::database::AppState;

/// Guards the admin data routes with a shared key
///
/// When `ADMIN_KEY` is configured the request must carry an `Authorization`
/// header with exactly that value. Without a configured key the check is
/// skipped.
pub async fn admin_guard(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if let Some(admin_key) = &state.config.admin_key {
        let authorized = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == admin_key);

        if !authorized {
            warn!(path = %request.uri().path(), "rejected admin request");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unauthorized",
                    "message": "Invalid or missing authorization header"
                })),
            )
                .into_response());
        }
    }

    Ok(next.run(request).await)
}
