//! The organization-creation collaborator the wizard submits to.

use std::sync::Arc;

use async_trait::async_trait;

use super::model::{Organization, OrganizationPayload};
use crate::error::SubmissionError;

/// Creates an organization from a completed onboarding payload.
#[async_trait]
pub trait OrganizationCreator: Send + Sync {
    async fn create_organization(
        &self,
        payload: OrganizationPayload,
    ) -> Result<Organization, SubmissionError>;
}

#[async_trait]
impl<T: OrganizationCreator + ?Sized> OrganizationCreator for Arc<T> {
    async fn create_organization(
        &self,
        payload: OrganizationPayload,
    ) -> Result<Organization, SubmissionError> {
        (**self).create_organization(payload).await
    }
}
