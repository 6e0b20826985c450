//! Campaign Dash: onboarding wizard engine and dashboard API for a
//! multi-tenant email/SMS marketing platform.

pub mod api_error;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod onboarding;
pub mod server;
pub mod store;
