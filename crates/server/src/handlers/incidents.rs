use axum::extract::{Path as AxumPath, Query, State};
use axum::Json;
use bidi_core::domain::model::Incident;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::auth::authorize_key;
use crate::errors::ServerError;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct IncidentQuery {
    pub limit: Option<i64>,
}

/// Most recent incidents first, the ongoing one included.
pub async fn incidents(
    State(state): State<AppState>,
    AxumPath(key): AxumPath<String>,
    Query(query): Query<IncidentQuery>,
) -> Result<Json<Vec<Incident>>, ServerError> {
    authorize_key(&state, &key).await?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let rows = state
        .ctx
        .repo
        .recent_incidents(limit)
        .await
        .map_err(ServerError::internal)?;
    Ok(Json(rows))
}
