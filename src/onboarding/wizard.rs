//! Step sequencer: drives a wizard variant from its first step to submission.
//!
//! Transitions are synchronous. The only suspend point is `submit()`, which
//! hands the finished payload to an [`OrganizationCreator`]. While a
//! submission is pending the wizard ignores navigation and rejects a second
//! submission.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::creator::OrganizationCreator;
use super::model::{Organization, OrganizationPayload, TeamMemberDraft, TeamRole, email_key};
use super::schema::WizardSchema;
use super::state::WizardState;
use super::validation::{FieldErrors, is_valid_email};
use crate::error::{OnboardingError, SubmissionError};

/// Default upper bound on a single `submit()` round trip.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Upper bound on drafted team members per organization.
pub const MAX_TEAM_MEMBERS: usize = 100;

/// Outcome of a synchronous step operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The wizard moved forward.
    Moved { from: u8, to: u8 },
    /// Nothing moved (value recorded on a confirm step, or wizard locked).
    Stayed,
    /// The current step failed validation; annotations are attached.
    Blocked(FieldErrors),
    /// The flow is finished; the caller should `submit()`.
    Submit,
}

/// Outcome of [`Wizard::proceed`].
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Moved { from: u8, to: u8 },
    Stayed,
    Blocked(FieldErrors),
    Submitted(Organization),
}

/// A submission that has been started but not finished.
///
/// Returned by [`Wizard::begin_submit`]; hand it back to
/// [`Wizard::finish_submit`] with the collaborator's answer.
#[derive(Debug)]
pub struct PendingSubmission {
    payload: OrganizationPayload,
    started_at: Instant,
}

impl PendingSubmission {
    pub fn payload(&self) -> &OrganizationPayload {
        &self.payload
    }
}

/// The onboarding step sequencer for schema `S`.
#[derive(Debug)]
pub struct Wizard<S: WizardSchema> {
    state: WizardState<S::Draft>,
    /// Normalized emails of the drafted team, kept in step with the list.
    team_emails: HashSet<String>,
    submit_timeout: Duration,
    in_flight: bool,
    completed: Option<Uuid>,
    _schema: PhantomData<S>,
}

impl<S: WizardSchema> Default for Wizard<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WizardSchema> Wizard<S> {
    pub fn new() -> Self {
        Self::from_draft(S::Draft::default())
    }

    /// Start at step 1 with answers already filled in.
    pub fn from_draft(draft: S::Draft) -> Self {
        let team_emails = S::team(&draft).iter().map(|m| email_key(&m.email)).collect();
        Self {
            state: WizardState::with_fields(S::TOTAL_STEPS, draft),
            team_emails,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            in_flight: false,
            completed: None,
            _schema: PhantomData,
        }
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Rebuild a wizard from a complete draft by walking the steps in order.
    ///
    /// Every step is validated as if the user had clicked through it, and
    /// team members are re-inserted through [`Wizard::add_team_member`], so a
    /// draft accepted here satisfies the same rules as the interactive flow.
    /// The returned wizard is ready to `submit()`.
    pub fn replay(mut draft: S::Draft) -> Result<Self, OnboardingError> {
        let members = S::team_mut(&mut draft)
            .map(std::mem::take)
            .unwrap_or_default();
        if members.len() > MAX_TEAM_MEMBERS {
            return Err(OnboardingError::TeamLimit {
                max: MAX_TEAM_MEMBERS,
            });
        }

        let mut wizard = Self::from_draft(draft);
        loop {
            match wizard.advance() {
                Transition::Moved { .. } => continue,
                Transition::Submit | Transition::Stayed => break,
                Transition::Blocked(errors) => {
                    return Err(OnboardingError::Validation {
                        step: wizard.current_step(),
                        errors,
                    });
                }
            }
        }

        for member in members {
            wizard.insert_team_member(&member.email, member.role, member.invited)?;
        }
        Ok(wizard)
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn state(&self) -> &WizardState<S::Draft> {
        &self.state
    }

    pub fn fields(&self) -> &S::Draft {
        &self.state.fields
    }

    pub fn current_step(&self) -> u8 {
        self.state.current_step()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    pub fn team_members(&self) -> &[TeamMemberDraft] {
        S::team(&self.state.fields)
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Id of the organization created by a successful submission.
    pub fn completed(&self) -> Option<Uuid> {
        self.completed
    }

    fn is_locked(&self) -> bool {
        self.in_flight || self.completed.is_some()
    }

    fn lock_error(&self) -> Option<SubmissionError> {
        if self.in_flight {
            Some(SubmissionError::InFlight)
        } else if self.completed.is_some() {
            Some(SubmissionError::AlreadyCompleted)
        } else {
            None
        }
    }

    // ── Step operations ─────────────────────────────────────────────

    /// Run the rules bound to `step`, replacing the error annotations.
    ///
    /// Returns false for a step outside the variant's range.
    pub fn validate_step(&mut self, step: u8) -> bool {
        let schema_step = S::step(step).filter(|_| self.state.contains_step(step));
        let Some(schema_step) = schema_step else {
            warn!(kind = %S::KIND, step, "validate_step called with out-of-range step");
            return false;
        };
        let errors = S::validate(&self.state.fields, schema_step);
        let valid = errors.is_empty();
        if !valid {
            debug!(
                kind = %S::KIND,
                step = %schema_step,
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Step failed validation"
            );
        }
        self.state.errors = errors;
        valid
    }

    /// Leave the current step: validate it, then either move forward or
    /// request submission (last step, or the branch answer says so).
    pub fn advance(&mut self) -> Transition {
        if self.is_locked() {
            return Transition::Stayed;
        }

        let from = self.state.current_step();
        if !self.validate_step(from) {
            return Transition::Blocked(self.state.errors.clone());
        }

        let Some(step) = S::step(from) else {
            return Transition::Stayed;
        };
        if S::submits_after(&self.state.fields, step) {
            debug!(kind = %S::KIND, step = %step, "Branch answer skips remaining steps");
            return Transition::Submit;
        }

        match self.state.step_forward() {
            Some(to) => {
                debug!(kind = %S::KIND, from, to, "Wizard advanced");
                Transition::Moved { from, to }
            }
            None => Transition::Submit,
        }
    }

    /// Go back one step without validation. A no-op at step 1.
    pub fn retreat(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        match self.state.step_backward() {
            Some(to) => {
                debug!(kind = %S::KIND, to, "Wizard went back");
                true
            }
            None => false,
        }
    }

    /// Record an answer. Picking an option on a single-select step also
    /// advances; confirm steps wait for an explicit `advance()`.
    pub fn set_field(&mut self, field: S::Field) -> Transition {
        if self.is_locked() {
            return Transition::Stayed;
        }
        let step = S::step_of(&field);
        S::apply(&mut self.state.fields, field);

        if S::number(step) == self.state.current_step() && S::auto_advances(step) {
            self.advance()
        } else {
            Transition::Stayed
        }
    }

    // ── Team drafts ─────────────────────────────────────────────────

    /// Append a team member. The list never holds the same email twice
    /// (case-insensitive); a duplicate leaves it unchanged.
    pub fn add_team_member(&mut self, email: &str, role: TeamRole) -> Result<(), OnboardingError> {
        self.insert_team_member(email, role, false)
    }

    fn insert_team_member(
        &mut self,
        email: &str,
        role: TeamRole,
        invited: bool,
    ) -> Result<(), OnboardingError> {
        if let Some(err) = self.lock_error() {
            return Err(err.into());
        }
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(OnboardingError::InvalidEmail {
                email: email.to_string(),
            });
        }
        let team = S::team_mut(&mut self.state.fields).ok_or(OnboardingError::TeamNotSupported)?;
        if team.len() >= MAX_TEAM_MEMBERS {
            return Err(OnboardingError::TeamLimit {
                max: MAX_TEAM_MEMBERS,
            });
        }
        if !self.team_emails.insert(email_key(email)) {
            return Err(OnboardingError::DuplicateEmail {
                email: email.to_string(),
            });
        }
        team.push(TeamMemberDraft {
            email: email.to_string(),
            role,
            invited,
        });
        debug!(email, role = %role, count = team.len(), "Team member drafted");
        Ok(())
    }

    pub fn remove_team_member(&mut self, email: &str) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(team) = S::team_mut(&mut self.state.fields) else {
            return false;
        };
        if !self.team_emails.remove(&email_key(email)) {
            return false;
        }
        team.retain(|m| !m.has_email(email));
        true
    }

    /// Flag a drafted member as invited. Local only: the real invite is sent
    /// by whoever consumes the created organization.
    pub fn mark_invited(&mut self, email: &str) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(team) = S::team_mut(&mut self.state.fields) else {
            return false;
        };
        match team.iter_mut().find(|m| m.has_email(email)) {
            Some(member) => {
                member.invited = true;
                true
            }
            None => false,
        }
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Lock the wizard and build the payload for the collaborator.
    ///
    /// Every step is re-validated, so answers edited after their step was
    /// passed cannot slip through.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmissionError> {
        if let Some(err) = self.lock_error() {
            return Err(err);
        }

        let payload = S::finalize(&self.state.fields)
            .map_err(|missing| SubmissionError::Incomplete { missing })?;

        for number in 1..=S::TOTAL_STEPS {
            if !self.validate_step(number) {
                return Err(SubmissionError::Invalid {
                    step: number,
                    errors: self.state.errors.clone(),
                });
            }
        }

        self.in_flight = true;
        Ok(PendingSubmission {
            payload,
            started_at: Instant::now(),
        })
    }

    /// Unlock the wizard with the collaborator's answer. On success the
    /// wizard is complete; on failure it is left as it was for a retry.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<Organization, SubmissionError>,
    ) -> Result<Organization, SubmissionError> {
        self.in_flight = false;
        let elapsed_ms = pending.started_at.elapsed().as_millis() as u64;
        match result {
            Ok(org) => {
                info!(kind = %S::KIND, org_id = %org.id, elapsed_ms, "Onboarding submitted");
                self.completed = Some(org.id);
                Ok(org)
            }
            Err(e) => {
                warn!(kind = %S::KIND, error = %e, elapsed_ms, "Onboarding submission failed");
                Err(e)
            }
        }
    }

    /// Submit the collected answers to `creator`, bounded by the submit timeout.
    pub async fn submit<C>(&mut self, creator: &C) -> Result<Organization, SubmissionError>
    where
        C: OrganizationCreator + ?Sized,
    {
        let pending = self.begin_submit()?;
        let timeout = self.submit_timeout;
        let request = creator.create_organization(pending.payload.clone());
        let result = match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(SubmissionError::Timeout(timeout)),
        };
        self.finish_submit(pending, result)
    }

    /// `advance()`, submitting when the flow is finished.
    pub async fn proceed<C>(&mut self, creator: &C) -> Result<Progress, SubmissionError>
    where
        C: OrganizationCreator + ?Sized,
    {
        match self.advance() {
            Transition::Moved { from, to } => Ok(Progress::Moved { from, to }),
            Transition::Stayed => Ok(Progress::Stayed),
            Transition::Blocked(errors) => Ok(Progress::Blocked(errors)),
            Transition::Submit => self.submit(creator).await.map(Progress::Submitted),
        }
    }
}
