use std::sync::Arc;

use bidi_core::app::context::AppContext;
use bidi_core::app::poller::Poller;
use bidi_core::ports::clock::Clock;
use bidi_core::ports::http::Http;
use bidi_core::ports::repo::Repo;

pub type SharedContext = AppContext<dyn Repo, dyn Http, dyn Clock>;

#[derive(Clone)]
pub struct AppState {
    pub ctx: SharedContext,
    /// Same poller the background loop runs; handlers use it for on-demand refresh.
    pub poller: Arc<Poller<dyn Repo, dyn Http, dyn Clock>>,
}

impl AppState {
    pub fn new(ctx: SharedContext) -> Self {
        let poller = Arc::new(Poller::new(ctx.clone()));
        Self { ctx, poller }
    }
}
