//! Onboarding wizard engine.
//!
//! A new organization is created by walking a fixed, variant-specific sequence
//! of steps (agency or ecommerce). Each step gates progress on its own
//! validation rules; the agency flow branches on whether the team is invited
//! now or later. The finished answer set is handed to an
//! [`OrganizationCreator`].

pub mod creator;
pub mod model;
pub mod routes;
pub mod schema;
pub mod state;
pub mod validation;
pub mod wizard;

pub use creator::OrganizationCreator;
pub use model::{
    AddTeamNow, AgencyDraft, BusinessAge, ClientCount, EcomDraft, MonthlyRevenue, Organization,
    OrganizationKind, OrganizationPayload, RetentionTeam, TeamMemberDraft, TeamRole, TeamSize,
    TrackingMethod,
};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use schema::{AgencyField, AgencySchema, EcomField, EcomSchema, WizardSchema};
pub use state::{Direction, WizardState};
pub use wizard::{Progress, Transition, Wizard};
