//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases. Organization answers are kept
//! as a JSON profile column; queued team members live in their own table so
//! the per-organization email uniqueness is enforced by the schema.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::onboarding::model::{
    Organization, OrganizationKind, OrganizationPayload, TeamMemberDraft, TeamRole,
};
use crate::store::migrations;
use crate::store::traits::Database;

const ORG_COLUMNS: &str = "id, kind, profile, created_at";

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::Pool(format!("Failed to create database directory: {e}"))
                })?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests and demos).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }

    async fn load_team(&self, org_id: &str) -> Result<Vec<TeamMemberDraft>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT email, role, invited FROM team_members
                 WHERE organization_id = ?1 ORDER BY position ASC",
                params![org_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("load_team: {e}")))?;

        let mut team = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("load_team: {e}")))?
        {
            team.push(row_to_member(&row)?);
        }
        Ok(team)
    }

    /// Attach stored team rows to an agency profile read back from JSON.
    async fn hydrate(&self, row: &libsql::Row) -> Result<Organization, DatabaseError> {
        let (id, mut org) = row_to_organization(row)?;
        if let OrganizationPayload::Agency(profile) = &mut org.profile {
            profile.team_members = self.load_team(&id).await?;
        }
        Ok(org)
    }

    async fn remove_organization(&self, id: &str) {
        let conn = self.conn();
        let cleanup = async {
            conn.execute(
                "DELETE FROM team_members WHERE organization_id = ?1",
                params![id],
            )
            .await?;
            conn.execute("DELETE FROM organizations WHERE id = ?1", params![id])
                .await
        };
        if let Err(e) = cleanup.await {
            warn!(org_id = %id, error = %e, "Failed to roll back partial organization insert");
        }
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

/// Serialize the answer set without team members; those go to `team_members`.
fn profile_json(payload: &OrganizationPayload) -> Result<String, DatabaseError> {
    let mut stored = payload.clone();
    if let OrganizationPayload::Agency(profile) = &mut stored {
        profile.team_members.clear();
    }
    serde_json::to_string(&stored)
        .map_err(|e| DatabaseError::Serialization(format!("organization profile: {e}")))
}

/// Map a row in `ORG_COLUMNS` order to an organization (team not yet loaded).
fn row_to_organization(row: &libsql::Row) -> Result<(String, Organization), DatabaseError> {
    let read = |e: libsql::Error| DatabaseError::Query(format!("organization row parse: {e}"));

    let id_str: String = row.get(0).map_err(read)?;
    let kind_str: String = row.get(1).map_err(read)?;
    let profile_str: String = row.get(2).map_err(read)?;
    let created_str: String = row.get(3).map_err(read)?;

    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DatabaseError::Serialization(format!("organization id {id_str}: {e}")))?;
    let profile: OrganizationPayload = serde_json::from_str(&profile_str)
        .map_err(|e| DatabaseError::Serialization(format!("organization {id_str} profile: {e}")))?;

    if profile.kind().as_str() != kind_str {
        return Err(DatabaseError::Serialization(format!(
            "organization {id_str}: kind column '{kind_str}' disagrees with profile '{}'",
            profile.kind()
        )));
    }

    let org = Organization {
        id,
        created_at: parse_datetime(&created_str),
        profile,
    };
    Ok((id_str, org))
}

fn row_to_member(row: &libsql::Row) -> Result<TeamMemberDraft, DatabaseError> {
    let read = |e: libsql::Error| DatabaseError::Query(format!("team member row parse: {e}"));

    let email: String = row.get(0).map_err(read)?;
    let role_str: String = row.get(1).map_err(read)?;
    let invited: i64 = row.get(2).map_err(read)?;
    let role: TeamRole = role_str.parse().map_err(DatabaseError::Serialization)?;

    Ok(TeamMemberDraft {
        email,
        role,
        invited: invited != 0,
    })
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn insert_organization(&self, org: &Organization) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let id = org.id.to_string();

        conn.execute(
            "INSERT INTO organizations (id, kind, name, profile, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.clone(),
                org.kind().as_str(),
                org.name(),
                profile_json(&org.profile)?,
                org.created_at.to_rfc3339()
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("insert_organization: {e}")))?;

        for (position, member) in org.profile.team_members().iter().enumerate() {
            let inserted = conn
                .execute(
                    "INSERT INTO team_members (id, organization_id, position, email, role, invited)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        Uuid::new_v4().to_string(),
                        id.clone(),
                        position as i64,
                        member.email.trim(),
                        member.role.label(),
                        member.invited as i64
                    ],
                )
                .await;

            if let Err(e) = inserted {
                self.remove_organization(&id).await;
                return Err(DatabaseError::Query(format!(
                    "insert_organization team member {}: {e}",
                    member.email
                )));
            }
        }

        debug!(
            org_id = %org.id,
            kind = %org.kind(),
            team = org.profile.team_members().len(),
            "Organization inserted"
        );
        Ok(())
    }

    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {ORG_COLUMNS} FROM organizations WHERE id = ?1"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_organization: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(self.hydrate(&row).await?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_organization: {e}"))),
        }
    }

    async fn list_organizations(
        &self,
        kind: Option<OrganizationKind>,
        limit: usize,
    ) -> Result<Vec<Organization>, DatabaseError> {
        let conn = self.conn();
        let mut rows = match kind {
            Some(kind) => {
                conn.query(
                    &format!(
                        "SELECT {ORG_COLUMNS} FROM organizations WHERE kind = ?1
                         ORDER BY created_at DESC LIMIT ?2"
                    ),
                    params![kind.as_str(), limit as i64],
                )
                .await
            }
            None => {
                conn.query(
                    &format!(
                        "SELECT {ORG_COLUMNS} FROM organizations
                         ORDER BY created_at DESC LIMIT ?1"
                    ),
                    params![limit as i64],
                )
                .await
            }
        }
        .map_err(|e| DatabaseError::Query(format!("list_organizations: {e}")))?;

        let mut orgs = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_organizations: {e}")))?
        {
            orgs.push(self.hydrate(&row).await?);
        }
        Ok(orgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::{
        AddTeamNow, AgencyProfile, BusinessAge, ClientCount, EcomProfile, MonthlyRevenue,
        RetentionTeam, TeamSize, TrackingMethod,
    };

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn agency(name: &str, team: Vec<TeamMemberDraft>) -> Organization {
        Organization::new(OrganizationPayload::Agency(AgencyProfile {
            name: name.into(),
            age: BusinessAge::ThreeToFiveYears,
            client_count: ClientCount::SixToFifteen,
            tracking_method: TrackingMethod::PlatformDashboards,
            team_size: TeamSize::TwoToFive,
            add_team_now: AddTeamNow::Yes,
            team_members: team,
        }))
    }

    fn ecom(name: &str) -> Organization {
        Organization::new(OrganizationPayload::Ecom(EcomProfile {
            name: name.into(),
            url: "https://acme.example".into(),
            age: BusinessAge::OneToTwoYears,
            revenue: MonthlyRevenue::From10kTo50k,
            tracking_method: TrackingMethod::Spreadsheets,
            retention_team: RetentionTeam::SelfManaged,
            team_size: TeamSize::JustMe,
            add_team_now: AddTeamNow::Later,
        }))
    }

    #[tokio::test]
    async fn insert_and_get_agency_with_team() {
        let db = test_db().await;
        let mut invited = TeamMemberDraft::new("b@x.com", TeamRole::Analyst);
        invited.invited = true;
        let org = agency(
            "Northwind",
            vec![TeamMemberDraft::new("a@x.com", TeamRole::Designer), invited],
        );

        db.insert_organization(&org).await.unwrap();
        let fetched = db.get_organization(org.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, org.id);
        assert_eq!(fetched.profile, org.profile);
        let team = fetched.profile.team_members();
        assert_eq!(team.len(), 2);
        assert_eq!(team[0].email, "a@x.com");
        assert!(team[1].invited);
    }

    #[tokio::test]
    async fn insert_and_get_ecom() {
        let db = test_db().await;
        let org = ecom("Acme Store");
        db.insert_organization(&org).await.unwrap();

        let fetched = db.get_organization(org.id).await.unwrap().unwrap();
        assert_eq!(fetched.kind(), OrganizationKind::Ecom);
        assert_eq!(fetched.name(), "Acme Store");
        assert_eq!(fetched.profile, org.profile);
    }

    #[tokio::test]
    async fn get_organization_not_found() {
        let db = test_db().await;
        assert!(db.get_organization(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_team_email_rolls_back() {
        let db = test_db().await;
        let org = agency(
            "Northwind",
            vec![
                TeamMemberDraft::new("a@x.com", TeamRole::Designer),
                TeamMemberDraft::new("A@X.com", TeamRole::Analyst),
            ],
        );

        let err = db.insert_organization(&org).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));
        assert!(db.get_organization(org.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_kind_and_limit() {
        let db = test_db().await;
        db.insert_organization(&agency("One", vec![])).await.unwrap();
        db.insert_organization(&agency("Two", vec![])).await.unwrap();
        db.insert_organization(&ecom("Shop")).await.unwrap();

        let all = db.list_organizations(None, 50).await.unwrap();
        assert_eq!(all.len(), 3);

        let agencies = db
            .list_organizations(Some(OrganizationKind::Agency), 50)
            .await
            .unwrap();
        assert_eq!(agencies.len(), 2);
        assert!(agencies.iter().all(|o| o.kind() == OrganizationKind::Agency));

        let limited = db.list_organizations(None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn on_disk_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dash.db");
        let org = ecom("Acme Store");

        {
            let db = LibSqlBackend::new_local(&path).await.unwrap();
            db.insert_organization(&org).await.unwrap();
        }

        let db = LibSqlBackend::new_local(&path).await.unwrap();
        let fetched = db.get_organization(org.id).await.unwrap().unwrap();
        assert_eq!(fetched.name(), "Acme Store");
    }

    #[tokio::test]
    async fn migrations_rerun_is_harmless() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }
}
