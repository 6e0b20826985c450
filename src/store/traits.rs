//! Async `Database` trait: the single persistence interface for organizations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::onboarding::model::{Organization, OrganizationKind};

/// Backend-agnostic database trait covering onboarded organizations.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    /// Insert a created organization together with its queued team members.
    async fn insert_organization(&self, org: &Organization) -> Result<(), DatabaseError>;

    /// Get an organization by ID.
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, DatabaseError>;

    /// List organizations, newest first, optionally filtered by kind.
    async fn list_organizations(
        &self,
        kind: Option<OrganizationKind>,
        limit: usize,
    ) -> Result<Vec<Organization>, DatabaseError>;
}
