use axum::extract::{Path as AxumPath, State};
use axum::Json;
use bidi_core::domain::model::CounterValues;

use crate::app_state::AppState;
use crate::auth::authorize_key;
use crate::errors::ServerError;

/// Includes the hit for this request.
pub async fn stats(
    State(state): State<AppState>,
    AxumPath(key): AxumPath<String>,
) -> Result<Json<CounterValues>, ServerError> {
    authorize_key(&state, &key).await?;
    let counters = state
        .ctx
        .counters
        .read()
        .await
        .map_err(ServerError::internal)?;
    Ok(Json(counters))
}
