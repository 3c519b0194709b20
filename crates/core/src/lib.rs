//! Status-tracking engine for the BankID status monitor.
//!
//! The [`app::poller::Poller`] fetches the public status page on a fixed
//! cadence, [`page::classify`] turns it into a [`domain::severity::SeverityCode`],
//! the [`app::tracker::IncidentTracker`] records color transitions as incidents,
//! and the [`app::timeline::TimelineStore`] keeps the observation log behind the
//! hourly 7-day view.

pub mod app;
pub mod domain;
pub mod infra;
pub mod page;
pub mod ports;
