use bidi_core::app::users;
use bidi_core::domain::model::UserRecord;
use bidi_core::ports::repo::RepoError;
use tracing::{debug, warn};

use crate::app_state::AppState;
use crate::errors::ServerError;

/// Counts the hit, then resolves `key` to its user. Counter failures are logged
/// and never reject the request.
pub async fn authorize_key(state: &AppState, key: &str) -> Result<UserRecord, ServerError> {
    let ctx = &state.ctx;
    record(ctx.counters.hit().await, "hits");

    let now_ms = ctx.clock.now_epoch_ms().await;
    let user = users::authorize(ctx.repo.as_ref(), key, now_ms)
        .await
        .map_err(ServerError::internal)?;

    match user {
        Some(user) => {
            record(ctx.counters.success().await, "success");
            debug!(user = %user.user, "API key accepted");
            Ok(user)
        }
        None => {
            record(ctx.counters.failure().await, "failed");
            warn!("API key rejected");
            Err(ServerError::unauthorized())
        }
    }
}

fn record(result: Result<(), RepoError>, counter: &'static str) {
    if let Err(e) = result {
        warn!(counter, error = %e, "Counter update failed");
    }
}
