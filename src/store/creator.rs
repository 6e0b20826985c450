//! Production `OrganizationCreator`: persists submitted organizations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::SubmissionError;
use crate::onboarding::creator::OrganizationCreator;
use crate::onboarding::model::{Organization, OrganizationPayload};
use crate::store::traits::Database;

/// Creates organizations by writing them to a `Database`.
#[derive(Clone)]
pub struct StoreCreator {
    db: Arc<dyn Database>,
}

impl StoreCreator {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizationCreator for StoreCreator {
    async fn create_organization(
        &self,
        payload: OrganizationPayload,
    ) -> Result<Organization, SubmissionError> {
        let org = Organization::new(payload);
        self.db.insert_organization(&org).await?;
        info!(org_id = %org.id, kind = %org.kind(), name = %org.name(), "Organization created");
        Ok(org)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::{
        AddTeamNow, BusinessAge, EcomProfile, MonthlyRevenue, RetentionTeam, TeamSize,
        TrackingMethod,
    };
    use crate::store::LibSqlBackend;

    fn payload() -> OrganizationPayload {
        OrganizationPayload::Ecom(EcomProfile {
            name: "Acme Store".into(),
            url: "https://acme.example".into(),
            age: BusinessAge::OneToTwoYears,
            revenue: MonthlyRevenue::From10kTo50k,
            tracking_method: TrackingMethod::Spreadsheets,
            retention_team: RetentionTeam::SelfManaged,
            team_size: TeamSize::JustMe,
            add_team_now: AddTeamNow::Later,
        })
    }

    #[tokio::test]
    async fn created_organization_is_persisted() {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let creator = StoreCreator::new(Arc::clone(&db));

        let org = creator.create_organization(payload()).await.unwrap();

        let stored = db.get_organization(org.id).await.unwrap().unwrap();
        assert_eq!(stored.profile, payload());
    }

    #[tokio::test]
    async fn each_submission_gets_a_fresh_id() {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let creator = StoreCreator::new(db);

        let a = creator.create_organization(payload()).await.unwrap();
        let b = creator.create_organization(payload()).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
