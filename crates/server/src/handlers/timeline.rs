use axum::extract::{Path as AxumPath, State};
use axum::Json;
use bidi_core::domain::timeline::BucketResult;

use crate::app_state::AppState;
use crate::auth::authorize_key;
use crate::errors::ServerError;

pub async fn timeline(
    State(state): State<AppState>,
    AxumPath(key): AxumPath<String>,
) -> Result<Json<Vec<BucketResult>>, ServerError> {
    authorize_key(&state, &key).await?;
    Ok(Json(load_buckets(&state).await?))
}

pub(super) async fn load_buckets(state: &AppState) -> Result<Vec<BucketResult>, ServerError> {
    let now_ms = state.ctx.clock.now_epoch_ms().await;
    let timeline = state
        .ctx
        .timeline
        .query(now_ms)
        .await
        .map_err(ServerError::internal)?;
    Ok(timeline.buckets().collect())
}
