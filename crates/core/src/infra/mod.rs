pub mod config;
pub mod logging;
pub mod reqwest_http;
pub mod sqlite_repo;
pub mod time;
