//! Onboarding data models: answer options, drafts, and created organizations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a closed set of answer options serialized by their display label.
macro_rules! option_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            /// Every option, in the order the form presents them.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == s)
                    .ok_or_else(|| format!("unknown {} option: {s}", stringify!($name)))
            }
        }
    };
}

option_enum! {
    /// How long the business has been operating.
    BusinessAge {
        UnderOneYear => "Less than 1 year",
        OneToTwoYears => "1-2 years",
        ThreeToFiveYears => "3-5 years",
        OverFiveYears => "5+ years",
    }
}

option_enum! {
    /// Number of clients an agency manages.
    ClientCount {
        OneToFive => "1-5",
        SixToFifteen => "6-15",
        SixteenToThirty => "16-30",
        OverThirty => "30+",
    }
}

option_enum! {
    /// How campaign performance is tracked today.
    TrackingMethod {
        Spreadsheets => "Spreadsheets",
        PlatformDashboards => "Platform dashboards",
        AnalyticsTool => "Analytics tool",
        NotTracked => "We don't track it",
    }
}

option_enum! {
    TeamSize {
        JustMe => "Just me",
        TwoToFive => "2-5",
        SixToFifteen => "6-15",
        OverFifteen => "16+",
    }
}

option_enum! {
    /// Answer to the branch question: invite the team now or after setup.
    AddTeamNow {
        Yes => "Yes, add team now",
        Later => "No, I'll do it later",
    }
}

option_enum! {
    /// Monthly store revenue bracket.
    MonthlyRevenue {
        Under10k => "Under $10k",
        From10kTo50k => "$10k - $50k",
        From50kTo250k => "$50k - $250k",
        Over250k => "$250k+",
    }
}

option_enum! {
    /// Who runs the store's email/SMS retention today.
    RetentionTeam {
        InHouse => "Yes, an in-house team",
        Agency => "Yes, an agency",
        SelfManaged => "No, I manage it myself",
    }
}

option_enum! {
    TeamRole {
        Admin => "Admin",
        Manager => "Manager",
        Designer => "Designer",
        Analyst => "Analyst",
        Viewer => "Viewer",
    }
}

/// A team member queued for invitation during agency onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDraft {
    pub email: String,
    pub role: TeamRole,
    /// Set once the invite has been (locally) sent. No delivery confirmation.
    #[serde(default)]
    pub invited: bool,
}

impl TeamMemberDraft {
    pub fn new(email: impl Into<String>, role: TeamRole) -> Self {
        Self {
            email: email.into(),
            role,
            invited: false,
        }
    }

    /// Case-insensitive email comparison used for de-duplication.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// Normalized form of an email for uniqueness checks. ASCII case folding,
/// matching SQLite's `lower()` on the team-member index.
pub fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Answers collected by the agency wizard. Every field is optional until the
/// step that owns it has been passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyDraft {
    pub name: Option<String>,
    pub age: Option<BusinessAge>,
    pub client_count: Option<ClientCount>,
    pub tracking_method: Option<TrackingMethod>,
    pub team_size: Option<TeamSize>,
    pub add_team_now: Option<AddTeamNow>,
    #[serde(default)]
    pub team_members: Vec<TeamMemberDraft>,
}

impl AgencyDraft {
    /// Wire names of required fields that have no value yet.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        if self.client_count.is_none() {
            missing.push("clientCount");
        }
        if self.tracking_method.is_none() {
            missing.push("trackingMethod");
        }
        if self.team_size.is_none() {
            missing.push("teamSize");
        }
        if self.add_team_now.is_none() {
            missing.push("addTeamNow");
        }
        missing
    }

    /// Convert into a complete profile, or report which fields are missing.
    pub fn to_profile(&self) -> Result<AgencyProfile, Vec<&'static str>> {
        match (
            &self.name,
            self.age,
            self.client_count,
            self.tracking_method,
            self.team_size,
            self.add_team_now,
        ) {
            (
                Some(name),
                Some(age),
                Some(client_count),
                Some(tracking_method),
                Some(team_size),
                Some(add_team_now),
            ) => Ok(AgencyProfile {
                name: name.clone(),
                age,
                client_count,
                tracking_method,
                team_size,
                add_team_now,
                team_members: self.team_members.clone(),
            }),
            _ => Err(self.missing_fields()),
        }
    }
}

/// Answers collected by the ecommerce wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcomDraft {
    pub name: Option<String>,
    pub url: Option<String>,
    pub age: Option<BusinessAge>,
    pub revenue: Option<MonthlyRevenue>,
    pub tracking_method: Option<TrackingMethod>,
    pub retention_team: Option<RetentionTeam>,
    pub team_size: Option<TeamSize>,
    pub add_team_now: Option<AddTeamNow>,
}

impl EcomDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks: [(&'static str, bool); 8] = [
            ("name", self.name.is_some()),
            ("url", self.url.is_some()),
            ("age", self.age.is_some()),
            ("revenue", self.revenue.is_some()),
            ("trackingMethod", self.tracking_method.is_some()),
            ("retentionTeam", self.retention_team.is_some()),
            ("teamSize", self.team_size.is_some()),
            ("addTeamNow", self.add_team_now.is_some()),
        ];
        checks
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(field, _)| field)
            .collect()
    }

    pub fn to_profile(&self) -> Result<EcomProfile, Vec<&'static str>> {
        match (
            &self.name,
            &self.url,
            self.age,
            self.revenue,
            self.tracking_method,
            self.retention_team,
            self.team_size,
            self.add_team_now,
        ) {
            (
                Some(name),
                Some(url),
                Some(age),
                Some(revenue),
                Some(tracking_method),
                Some(retention_team),
                Some(team_size),
                Some(add_team_now),
            ) => Ok(EcomProfile {
                name: name.clone(),
                url: url.clone(),
                age,
                revenue,
                tracking_method,
                retention_team,
                team_size,
                add_team_now,
            }),
            _ => Err(self.missing_fields()),
        }
    }
}

/// A complete agency answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyProfile {
    pub name: String,
    pub age: BusinessAge,
    pub client_count: ClientCount,
    pub tracking_method: TrackingMethod,
    pub team_size: TeamSize,
    pub add_team_now: AddTeamNow,
    #[serde(default)]
    pub team_members: Vec<TeamMemberDraft>,
}

/// A complete ecommerce answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcomProfile {
    pub name: String,
    pub url: String,
    pub age: BusinessAge,
    pub revenue: MonthlyRevenue,
    pub tracking_method: TrackingMethod,
    pub retention_team: RetentionTeam,
    pub team_size: TeamSize,
    pub add_team_now: AddTeamNow,
}

/// Which kind of organization a wizard creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationKind {
    Agency,
    Ecom,
}

impl OrganizationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agency => "agency",
            Self::Ecom => "ecom",
        }
    }
}

impl std::fmt::Display for OrganizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrganizationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agency" => Ok(Self::Agency),
            "ecom" => Ok(Self::Ecom),
            other => Err(format!("unknown organization type: {other}")),
        }
    }
}

/// The payload handed to the organization-creation service: the complete
/// answer set, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OrganizationPayload {
    Agency(AgencyProfile),
    Ecom(EcomProfile),
}

impl OrganizationPayload {
    pub fn kind(&self) -> OrganizationKind {
        match self {
            Self::Agency(_) => OrganizationKind::Agency,
            Self::Ecom(_) => OrganizationKind::Ecom,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Agency(p) => &p.name,
            Self::Ecom(p) => &p.name,
        }
    }

    pub fn team_members(&self) -> &[TeamMemberDraft] {
        match self {
            Self::Agency(p) => &p.team_members,
            Self::Ecom(_) => &[],
        }
    }
}

/// A created organization record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: OrganizationPayload,
}

impl Organization {
    pub fn new(profile: OrganizationPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            profile,
        }
    }

    pub fn kind(&self) -> OrganizationKind {
        self.profile.kind()
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_labels_match_serde() {
        for age in BusinessAge::ALL {
            let json = serde_json::to_string(age).unwrap();
            assert_eq!(json, format!("\"{}\"", age.label()));
        }
        let later: AddTeamNow = serde_json::from_str("\"No, I'll do it later\"").unwrap();
        assert_eq!(later, AddTeamNow::Later);
    }

    #[test]
    fn option_from_str_rejects_unknown() {
        assert_eq!(
            "$10k - $50k".parse::<MonthlyRevenue>(),
            Ok(MonthlyRevenue::From10kTo50k)
        );
        assert!("a lot".parse::<MonthlyRevenue>().is_err());
    }

    #[test]
    fn team_member_email_match_ignores_case() {
        let member = TeamMemberDraft::new("a@x.com", TeamRole::Designer);
        assert!(member.has_email("A@X.com"));
        assert!(member.has_email(" a@x.com "));
        assert!(!member.has_email("b@x.com"));
        assert!(!member.invited);
        assert_eq!(email_key(" A@X.com "), email_key("a@x.com"));
    }

    #[test]
    fn agency_missing_fields_uses_wire_names() {
        let draft = AgencyDraft {
            name: Some("Northwind".into()),
            age: Some(BusinessAge::OneToTwoYears),
            ..Default::default()
        };
        assert_eq!(
            draft.missing_fields(),
            vec!["clientCount", "trackingMethod", "teamSize", "addTeamNow"]
        );
        assert!(draft.to_profile().is_err());
    }

    #[test]
    fn ecom_profile_from_complete_draft() {
        let draft = EcomDraft {
            name: Some("Acme Store".into()),
            url: Some("https://acme.example".into()),
            age: Some(BusinessAge::OneToTwoYears),
            revenue: Some(MonthlyRevenue::From10kTo50k),
            tracking_method: Some(TrackingMethod::Spreadsheets),
            retention_team: Some(RetentionTeam::SelfManaged),
            team_size: Some(TeamSize::JustMe),
            add_team_now: Some(AddTeamNow::Later),
        };
        let profile = draft.to_profile().unwrap();
        assert_eq!(profile.name, "Acme Store");
        assert_eq!(profile.retention_team, RetentionTeam::SelfManaged);
    }

    #[test]
    fn payload_is_tagged_with_type() {
        let payload = OrganizationPayload::Ecom(EcomProfile {
            name: "Acme Store".into(),
            url: "https://acme.example".into(),
            age: BusinessAge::OneToTwoYears,
            revenue: MonthlyRevenue::From10kTo50k,
            tracking_method: TrackingMethod::Spreadsheets,
            retention_team: RetentionTeam::SelfManaged,
            team_size: TeamSize::JustMe,
            add_team_now: AddTeamNow::Later,
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "ecom");
        assert_eq!(json["revenue"], "$10k - $50k");
        assert_eq!(json["retentionTeam"], "No, I manage it myself");
        assert_eq!(json["addTeamNow"], "No, I'll do it later");
    }

    #[test]
    fn organization_serde_roundtrip() {
        let org = Organization::new(OrganizationPayload::Agency(AgencyProfile {
            name: "Northwind".into(),
            age: BusinessAge::ThreeToFiveYears,
            client_count: ClientCount::SixToFifteen,
            tracking_method: TrackingMethod::AnalyticsTool,
            team_size: TeamSize::TwoToFive,
            add_team_now: AddTeamNow::Yes,
            team_members: vec![TeamMemberDraft::new("a@x.com", TeamRole::Designer)],
        }));

        let json = serde_json::to_string(&org).unwrap();
        let parsed: Organization = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, org);
        assert_eq!(parsed.kind(), OrganizationKind::Agency);
        assert_eq!(parsed.profile.team_members().len(), 1);
    }
}
