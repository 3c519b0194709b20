use axum::extract::{Path as AxumPath, State};
use axum::response::Html;
use bidi_core::infra::time::format_epoch_ms;

use super::refresh_if_configured;
use super::timeline::load_buckets;
use crate::app_state::AppState;
use crate::auth::authorize_key;
use crate::errors::ServerError;
use crate::view::render_status_page;

pub async fn status_page(
    State(state): State<AppState>,
    AxumPath(key): AxumPath<String>,
) -> Result<Html<String>, ServerError> {
    authorize_key(&state, &key).await?;
    refresh_if_configured(&state).await;

    let snapshot = state.ctx.status.current();
    let buckets = load_buckets(&state).await?;
    let updated = snapshot
        .updated_at_ms
        .map(|ms| format_epoch_ms(ms, &state.ctx.cfg.timezone))
        .unwrap_or_else(|| "-".to_string());

    Ok(Html(render_status_page(&snapshot, &buckets, &updated)))
}
