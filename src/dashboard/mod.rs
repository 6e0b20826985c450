//! Post-onboarding dashboard reporting: ROI math and demo overview series.

pub mod demo;
pub mod roi;
pub mod routes;

pub use demo::{DailyPoint, Overview, generate_overview};
pub use roi::{CampaignMetrics, Channel, RoiSummary, Totals};
pub use routes::{DashboardRouteState, dashboard_routes};
