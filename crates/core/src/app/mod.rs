pub mod context;
pub mod counters;
pub mod poller;
pub mod snapshot;
pub mod timeline;
pub mod tracker;
pub mod users;
