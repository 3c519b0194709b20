use axum::extract::{Path as AxumPath, State};
use axum::Json;

use super::refresh_if_configured;
use crate::app_state::AppState;
use crate::auth::authorize_key;
use crate::errors::ServerError;
use crate::models::ApiResponse;

pub async fn status(
    State(state): State<AppState>,
    AxumPath(key): AxumPath<String>,
) -> Result<Json<ApiResponse>, ServerError> {
    authorize_key(&state, &key).await?;
    refresh_if_configured(&state).await;

    let snapshot = state.ctx.status.current();
    Ok(Json(ApiResponse::from(&snapshot)))
}
