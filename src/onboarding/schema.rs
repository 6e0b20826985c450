//! Per-variant wizard schemas.
//!
//! Each variant is its own type with its own step and field enums, so asking
//! the ecommerce wizard for an agency field does not compile.

use super::model::{
    AddTeamNow, AgencyDraft, BusinessAge, ClientCount, EcomDraft, MonthlyRevenue,
    OrganizationKind, OrganizationPayload, RetentionTeam, TeamMemberDraft, TeamSize,
    TrackingMethod,
};
use super::validation::{FieldErrors, require_choice, require_text, require_url};

/// The contract a wizard variant provides to the step sequencer.
pub trait WizardSchema: Send + Sync + 'static {
    /// Answers collected so far.
    type Draft: Default + Clone + std::fmt::Debug + Send + Sync;
    /// A typed answer for one field.
    type Field: Clone + std::fmt::Debug;
    type Step: Copy + PartialEq + std::fmt::Debug + std::fmt::Display;

    const KIND: OrganizationKind;
    const TOTAL_STEPS: u8;

    /// Map a 1-indexed step number to the variant's step.
    fn step(number: u8) -> Option<Self::Step>;

    /// The step that owns a field.
    fn step_of(field: &Self::Field) -> Self::Step;

    fn number(step: Self::Step) -> u8;

    fn apply(draft: &mut Self::Draft, field: Self::Field);

    /// Run the rules bound to `step`. An empty map means the step passes.
    fn validate(draft: &Self::Draft, step: Self::Step) -> FieldErrors;

    /// Single-select steps advance as soon as their answer is recorded.
    fn auto_advances(step: Self::Step) -> bool;

    /// Whether leaving `step` should submit instead of moving on.
    fn submits_after(_draft: &Self::Draft, _step: Self::Step) -> bool {
        false
    }

    /// The team draft list, for variants that collect one.
    fn team_mut(_draft: &mut Self::Draft) -> Option<&mut Vec<TeamMemberDraft>> {
        None
    }

    fn team(_draft: &Self::Draft) -> &[TeamMemberDraft] {
        &[]
    }

    /// Build the submission payload, or list the missing required fields.
    fn finalize(draft: &Self::Draft) -> Result<OrganizationPayload, Vec<&'static str>>;
}

// ── Agency ──────────────────────────────────────────────────────────

/// Agency onboarding: seven steps, branching at `AddTeamNow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgencySchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgencyStep {
    Name,
    Age,
    ClientCount,
    TrackingMethod,
    TeamSize,
    AddTeamNow,
    TeamMembers,
}

impl std::fmt::Display for AgencyStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::ClientCount => "client_count",
            Self::TrackingMethod => "tracking_method",
            Self::TeamSize => "team_size",
            Self::AddTeamNow => "add_team_now",
            Self::TeamMembers => "team_members",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgencyField {
    Name(String),
    Age(BusinessAge),
    ClientCount(ClientCount),
    TrackingMethod(TrackingMethod),
    TeamSize(TeamSize),
    AddTeamNow(AddTeamNow),
}

impl WizardSchema for AgencySchema {
    type Draft = AgencyDraft;
    type Field = AgencyField;
    type Step = AgencyStep;

    const KIND: OrganizationKind = OrganizationKind::Agency;
    const TOTAL_STEPS: u8 = 7;

    fn step(number: u8) -> Option<AgencyStep> {
        use AgencyStep::*;
        match number {
            1 => Some(Name),
            2 => Some(Age),
            3 => Some(ClientCount),
            4 => Some(TrackingMethod),
            5 => Some(TeamSize),
            6 => Some(AddTeamNow),
            7 => Some(TeamMembers),
            _ => None,
        }
    }

    fn number(step: AgencyStep) -> u8 {
        use AgencyStep::*;
        match step {
            Name => 1,
            Age => 2,
            ClientCount => 3,
            TrackingMethod => 4,
            TeamSize => 5,
            AddTeamNow => 6,
            TeamMembers => 7,
        }
    }

    fn step_of(field: &AgencyField) -> AgencyStep {
        match field {
            AgencyField::Name(_) => AgencyStep::Name,
            AgencyField::Age(_) => AgencyStep::Age,
            AgencyField::ClientCount(_) => AgencyStep::ClientCount,
            AgencyField::TrackingMethod(_) => AgencyStep::TrackingMethod,
            AgencyField::TeamSize(_) => AgencyStep::TeamSize,
            AgencyField::AddTeamNow(_) => AgencyStep::AddTeamNow,
        }
    }

    fn apply(draft: &mut AgencyDraft, field: AgencyField) {
        match field {
            AgencyField::Name(v) => draft.name = Some(v),
            AgencyField::Age(v) => draft.age = Some(v),
            AgencyField::ClientCount(v) => draft.client_count = Some(v),
            AgencyField::TrackingMethod(v) => draft.tracking_method = Some(v),
            AgencyField::TeamSize(v) => draft.team_size = Some(v),
            AgencyField::AddTeamNow(v) => draft.add_team_now = Some(v),
        }
    }

    fn validate(draft: &AgencyDraft, step: AgencyStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            AgencyStep::Name => require_text(&mut errors, "name", draft.name.as_deref()),
            AgencyStep::Age => require_choice(&mut errors, "age", draft.age.as_ref()),
            AgencyStep::ClientCount => {
                require_choice(&mut errors, "clientCount", draft.client_count.as_ref())
            }
            AgencyStep::TrackingMethod => {
                require_choice(&mut errors, "trackingMethod", draft.tracking_method.as_ref())
            }
            AgencyStep::TeamSize => {
                require_choice(&mut errors, "teamSize", draft.team_size.as_ref())
            }
            AgencyStep::AddTeamNow => {
                require_choice(&mut errors, "addTeamNow", draft.add_team_now.as_ref())
            }
            // Entries are checked when they are added.
            AgencyStep::TeamMembers => {}
        }
        errors
    }

    fn auto_advances(step: AgencyStep) -> bool {
        !matches!(step, AgencyStep::Name | AgencyStep::TeamMembers)
    }

    fn submits_after(draft: &AgencyDraft, step: AgencyStep) -> bool {
        step == AgencyStep::AddTeamNow && draft.add_team_now == Some(AddTeamNow::Later)
    }

    fn team_mut(draft: &mut AgencyDraft) -> Option<&mut Vec<TeamMemberDraft>> {
        Some(&mut draft.team_members)
    }

    fn team(draft: &AgencyDraft) -> &[TeamMemberDraft] {
        &draft.team_members
    }

    fn finalize(draft: &AgencyDraft) -> Result<OrganizationPayload, Vec<&'static str>> {
        draft.to_profile().map(OrganizationPayload::Agency)
    }
}

// ── Ecommerce ───────────────────────────────────────────────────────

/// Ecommerce onboarding: six steps, no branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcomSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcomStep {
    Store,
    Age,
    Revenue,
    TrackingMethod,
    RetentionTeam,
    Team,
}

impl std::fmt::Display for EcomStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Store => "store",
            Self::Age => "age",
            Self::Revenue => "revenue",
            Self::TrackingMethod => "tracking_method",
            Self::RetentionTeam => "retention_team",
            Self::Team => "team",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcomField {
    Name(String),
    Url(String),
    Age(BusinessAge),
    Revenue(MonthlyRevenue),
    TrackingMethod(TrackingMethod),
    RetentionTeam(RetentionTeam),
    TeamSize(TeamSize),
    AddTeamNow(AddTeamNow),
}

impl WizardSchema for EcomSchema {
    type Draft = EcomDraft;
    type Field = EcomField;
    type Step = EcomStep;

    const KIND: OrganizationKind = OrganizationKind::Ecom;
    const TOTAL_STEPS: u8 = 6;

    fn step(number: u8) -> Option<EcomStep> {
        use EcomStep::*;
        match number {
            1 => Some(Store),
            2 => Some(Age),
            3 => Some(Revenue),
            4 => Some(TrackingMethod),
            5 => Some(RetentionTeam),
            6 => Some(Team),
            _ => None,
        }
    }

    fn number(step: EcomStep) -> u8 {
        use EcomStep::*;
        match step {
            Store => 1,
            Age => 2,
            Revenue => 3,
            TrackingMethod => 4,
            RetentionTeam => 5,
            Team => 6,
        }
    }

    fn step_of(field: &EcomField) -> EcomStep {
        match field {
            EcomField::Name(_) | EcomField::Url(_) => EcomStep::Store,
            EcomField::Age(_) => EcomStep::Age,
            EcomField::Revenue(_) => EcomStep::Revenue,
            EcomField::TrackingMethod(_) => EcomStep::TrackingMethod,
            EcomField::RetentionTeam(_) => EcomStep::RetentionTeam,
            EcomField::TeamSize(_) | EcomField::AddTeamNow(_) => EcomStep::Team,
        }
    }

    fn apply(draft: &mut EcomDraft, field: EcomField) {
        match field {
            EcomField::Name(v) => draft.name = Some(v),
            EcomField::Url(v) => draft.url = Some(v),
            EcomField::Age(v) => draft.age = Some(v),
            EcomField::Revenue(v) => draft.revenue = Some(v),
            EcomField::TrackingMethod(v) => draft.tracking_method = Some(v),
            EcomField::RetentionTeam(v) => draft.retention_team = Some(v),
            EcomField::TeamSize(v) => draft.team_size = Some(v),
            EcomField::AddTeamNow(v) => draft.add_team_now = Some(v),
        }
    }

    fn validate(draft: &EcomDraft, step: EcomStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            EcomStep::Store => {
                require_text(&mut errors, "name", draft.name.as_deref());
                require_url(&mut errors, "url", draft.url.as_deref());
            }
            EcomStep::Age => require_choice(&mut errors, "age", draft.age.as_ref()),
            EcomStep::Revenue => require_choice(&mut errors, "revenue", draft.revenue.as_ref()),
            EcomStep::TrackingMethod => {
                require_choice(&mut errors, "trackingMethod", draft.tracking_method.as_ref())
            }
            EcomStep::RetentionTeam => {
                require_choice(&mut errors, "retentionTeam", draft.retention_team.as_ref())
            }
            EcomStep::Team => {
                require_choice(&mut errors, "teamSize", draft.team_size.as_ref());
                require_choice(&mut errors, "addTeamNow", draft.add_team_now.as_ref());
            }
        }
        errors
    }

    fn auto_advances(step: EcomStep) -> bool {
        !matches!(step, EcomStep::Store | EcomStep::Team)
    }

    fn finalize(draft: &EcomDraft) -> Result<OrganizationPayload, Vec<&'static str>> {
        draft.to_profile().map(OrganizationPayload::Ecom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agency_step_numbers_roundtrip() {
        for n in 1..=AgencySchema::TOTAL_STEPS {
            let step = AgencySchema::step(n).unwrap();
            assert_eq!(AgencySchema::number(step), n);
        }
        assert!(AgencySchema::step(0).is_none());
        assert!(AgencySchema::step(8).is_none());
    }

    #[test]
    fn ecom_step_numbers_roundtrip() {
        for n in 1..=EcomSchema::TOTAL_STEPS {
            let step = EcomSchema::step(n).unwrap();
            assert_eq!(EcomSchema::number(step), n);
        }
        assert!(EcomSchema::step(7).is_none());
    }

    #[test]
    fn agency_branch_only_on_later() {
        let mut draft = AgencyDraft::default();
        assert!(!AgencySchema::submits_after(&draft, AgencyStep::AddTeamNow));

        draft.add_team_now = Some(AddTeamNow::Later);
        assert!(AgencySchema::submits_after(&draft, AgencyStep::AddTeamNow));
        assert!(!AgencySchema::submits_after(&draft, AgencyStep::TeamSize));

        draft.add_team_now = Some(AddTeamNow::Yes);
        assert!(!AgencySchema::submits_after(&draft, AgencyStep::AddTeamNow));
    }

    #[test]
    fn ecom_never_branches() {
        let draft = EcomDraft {
            add_team_now: Some(AddTeamNow::Later),
            ..Default::default()
        };
        for n in 1..=EcomSchema::TOTAL_STEPS {
            assert!(!EcomSchema::submits_after(&draft, EcomSchema::step(n).unwrap()));
        }
    }

    #[test]
    fn ecom_store_step_checks_name_and_url() {
        let draft = EcomDraft {
            name: Some("Acme Store".into()),
            url: Some("acme".into()),
            ..Default::default()
        };
        let errors = EcomSchema::validate(&draft, EcomStep::Store);
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec!["url"]);
    }

    #[test]
    fn team_members_step_always_passes() {
        let draft = AgencyDraft::default();
        assert!(AgencySchema::validate(&draft, AgencyStep::TeamMembers).is_empty());
    }

    #[test]
    fn confirm_steps_do_not_auto_advance() {
        assert!(!AgencySchema::auto_advances(AgencyStep::Name));
        assert!(!AgencySchema::auto_advances(AgencyStep::TeamMembers));
        assert!(AgencySchema::auto_advances(AgencyStep::AddTeamNow));
        assert!(!EcomSchema::auto_advances(EcomStep::Store));
        assert!(!EcomSchema::auto_advances(EcomStep::Team));
        assert!(EcomSchema::auto_advances(EcomStep::Revenue));
    }

    #[test]
    fn fields_map_to_owning_step() {
        assert_eq!(
            EcomSchema::step_of(&EcomField::Url("https://acme.example".into())),
            EcomStep::Store
        );
        assert_eq!(
            EcomSchema::step_of(&EcomField::AddTeamNow(AddTeamNow::Later)),
            EcomStep::Team
        );
        assert_eq!(
            AgencySchema::step_of(&AgencyField::AddTeamNow(AddTeamNow::Yes)),
            AgencyStep::AddTeamNow
        );
    }
}
