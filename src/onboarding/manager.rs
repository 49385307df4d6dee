//! OnboardingWizard — owns the wizard state and mediates every transition.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::notify::{Notification, Notifier};

use super::model::{RecipientApplication, StepRecord};
use super::schema::{CandidateValues, FieldErrors, FORM_ERROR_KEY};
use super::state::{OnboardingStep, WizardState, WizardStatus};

/// Receives the finished application after the last step validates.
pub trait SubmissionHandler: Send + Sync {
    fn submit(&self, application: &RecipientApplication);
}

/// Logs the application and tells the user it is under review.
pub struct NotifyingSubmissionHandler {
    notifier: Arc<dyn Notifier>,
}

impl NotifyingSubmissionHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

impl SubmissionHandler for NotifyingSubmissionHandler {
    fn submit(&self, application: &RecipientApplication) {
        info!(
            recipient = %application.basic_info.name,
            title = %application.opportunity.title,
            category = %application.opportunity.category,
            goal = %application.opportunity.goal_amount,
            proofs = application.wallet.proof_cids.len(),
            "Recipient application submitted"
        );
        self.notifier.notify(Notification::info(
            "Registration Submitted!",
            "Your recipient profile has been submitted for verification.",
        ));
    }
}

/// Result of submitting the active step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Step accepted, wizard moved forward.
    Advanced { to: OnboardingStep },
    /// Last step accepted, application handed to the submission handler.
    Submitted { application: RecipientApplication },
    /// Validation failed; nothing changed.
    Rejected { errors: FieldErrors },
    /// The wizard already submitted and is waiting for `initialize`.
    AlreadySubmitted,
}

/// Serializable snapshot of the wizard for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub step: OnboardingStep,
    pub index: usize,
    pub total: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub progress: u32,
    pub status: WizardStatus,
    pub values: CandidateValues,
}

/// The recipient onboarding wizard.
///
/// Validation failures are returned as [`StepOutcome::Rejected`]; no
/// operation here returns an error.
pub struct OnboardingWizard {
    state: WizardState,
    handler: Arc<dyn SubmissionHandler>,
}

impl OnboardingWizard {
    pub fn new(handler: Arc<dyn SubmissionHandler>) -> Self {
        Self {
            state: WizardState::default(),
            handler,
        }
    }

    /// Back to the first step with an empty record.
    pub fn initialize(&mut self) {
        self.state = WizardState::default();
        debug!("Onboarding wizard initialized");
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn active_step(&self) -> OnboardingStep {
        self.state.active_step
    }

    /// Validate `candidate` against the active step.
    ///
    /// On success only the active step's slot is replaced. Earlier steps are
    /// not re-validated.
    pub fn submit_active_step(&mut self, candidate: &CandidateValues) -> StepOutcome {
        if self.state.is_submitted() {
            debug!("Submit ignored, application already submitted");
            return StepOutcome::AlreadySubmitted;
        }

        let step = self.state.active_step;
        let record = match StepRecord::parse(step, candidate) {
            Ok(record) => record,
            Err(errors) => {
                debug!(step = %step, errors = errors.len(), "Step rejected");
                return StepOutcome::Rejected { errors };
            }
        };

        if step.is_last() {
            let previous = self.state.record.clone();
            self.state.record.insert(record);
            let Some(application) = self.state.record.complete() else {
                warn!(step = %step, "Final step reached with incomplete record");
                self.state.record = previous;
                let mut errors = FieldErrors::new();
                errors.insert(FORM_ERROR_KEY, "Please complete every step before submitting");
                return StepOutcome::Rejected { errors };
            };
            self.handler.submit(&application);
            self.state.status = WizardStatus::Submitted;
            return StepOutcome::Submitted { application };
        }

        self.state.record.insert(record);
        match self.state.advance() {
            Ok(to) => {
                info!(from = %step, to = %to, "Onboarding step completed");
                StepOutcome::Advanced { to }
            }
            Err(e) => {
                // Unreachable while `is_last` and `next` agree.
                warn!(step = %step, error = %e, "Failed to advance onboarding step");
                StepOutcome::Advanced { to: step }
            }
        }
    }

    /// Step back once and return the re-seeded values for the new step.
    ///
    /// No-op on the first step and after submission; the current values are
    /// returned either way.
    pub fn go_to_previous_step(&mut self) -> CandidateValues {
        if !self.state.is_submitted() {
            if let Some(step) = self.state.retreat() {
                debug!(step = %step, "Moved back");
            }
        }
        self.candidate_values()
    }

    /// Values to show in the active step's form.
    pub fn candidate_values(&self) -> CandidateValues {
        let step = self.state.active_step;
        step.schema().seed(&self.state.record.values_for(step))
    }

    pub fn view(&self) -> WizardView {
        let step = self.state.active_step;
        WizardView {
            step,
            index: step.index(),
            total: OnboardingStep::COUNT,
            title: step.title(),
            description: step.description(),
            progress: step.progress_percent(),
            status: self.state.status,
            values: self.candidate_values(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{Value, json};

    use super::*;

    #[derive(Default)]
    struct Recording(Mutex<Vec<RecipientApplication>>);

    impl SubmissionHandler for Recording {
        fn submit(&self, application: &RecipientApplication) {
            self.0.lock().unwrap().push(application.clone());
        }
    }

    fn values(v: Value) -> CandidateValues {
        v.as_object().cloned().unwrap()
    }

    fn wizard() -> (OnboardingWizard, Arc<Recording>) {
        let handler = Arc::new(Recording::default());
        (OnboardingWizard::new(handler.clone()), handler)
    }

    fn opportunity() -> CandidateValues {
        values(json!({
            "title": "Clean Water",
            "summary": "Wells for three rural villages",
            "description": "We will drill and maintain three wells serving over a thousand people.",
            "impact": "Safe water for 1200 residents",
            "category": "Environment",
            "country": "Kenya",
            "proofType": "Images",
            "goalAmount": "500"
        }))
    }

    #[test]
    fn rejected_step_changes_nothing() {
        let (mut wizard, _) = wizard();
        let outcome = wizard.submit_active_step(&values(json!({ "name": "Al", "bio": "short" })));

        let StepOutcome::Rejected { errors } = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.get("bio"), Some("Biography must be at least 10 characters"));
        assert!(!errors.contains("name"));
        assert_eq!(wizard.active_step(), OnboardingStep::BasicInfo);
        assert!(wizard.state().record.is_empty());
    }

    #[test]
    fn valid_step_advances_by_one() {
        let (mut wizard, _) = wizard();
        let candidate = values(json!({ "name": "Ada", "bio": "Builds water filters" }));
        let outcome = wizard.submit_active_step(&candidate);
        assert_eq!(
            outcome,
            StepOutcome::Advanced {
                to: OnboardingStep::OpportunityDetails
            }
        );
        assert!(wizard.state().record.has(OnboardingStep::BasicInfo));
    }

    #[test]
    fn back_reseeds_previous_values() {
        let (mut wizard, _) = wizard();
        wizard.submit_active_step(&values(json!({ "name": "Ada", "bio": "Builds water filters" })));
        wizard.submit_active_step(&opportunity());

        let seeded = wizard.go_to_previous_step();
        assert_eq!(wizard.active_step(), OnboardingStep::OpportunityDetails);
        assert_eq!(seeded["goalAmount"], "500");
        assert_eq!(seeded["city"], "");
        assert_eq!(seeded["isGlobal"], false);
    }

    #[test]
    fn fresh_step_shows_defaults() {
        let (wizard, _) = wizard();
        let values = wizard.candidate_values();
        assert_eq!(values["name"], "");
        assert_eq!(values["bio"], "");
    }

    #[test]
    fn view_reports_progress() {
        let (mut wizard, _) = wizard();
        wizard.submit_active_step(&values(json!({ "name": "Ada", "bio": "Builds water filters" })));
        let view = wizard.view();
        assert_eq!(view.index, 1);
        assert_eq!(view.total, 4);
        assert_eq!(view.progress, 33);
        assert_eq!(view.title, "Opportunity Details");
        assert_eq!(view.status, WizardStatus::InProgress);
    }

    #[test]
    fn full_run_submits_once_then_freezes() {
        let (mut wizard, handler) = wizard();
        wizard.submit_active_step(&values(json!({ "name": "Ada", "bio": "Builds water filters" })));
        wizard.submit_active_step(&opportunity());
        wizard.submit_active_step(&values(json!({
            "walletAddress": "0x1234567890abcdef1234567890abcdef12345678"
        })));
        let identity = values(json!({
            "proofOfIdentity": "passport",
            "proofOfWork": "three wells",
            "agreeToTerms": true
        }));

        let outcome = wizard.submit_active_step(&identity);
        assert!(matches!(outcome, StepOutcome::Submitted { .. }));
        assert_eq!(wizard.active_step(), OnboardingStep::IdentityVerification);
        assert_eq!(wizard.submit_active_step(&identity), StepOutcome::AlreadySubmitted);
        wizard.go_to_previous_step();
        assert_eq!(wizard.active_step(), OnboardingStep::IdentityVerification);
        assert_eq!(handler.0.lock().unwrap().len(), 1);

        wizard.initialize();
        assert_eq!(wizard.active_step(), OnboardingStep::BasicInfo);
        assert!(wizard.state().record.is_empty());
        assert_eq!(wizard.state().status, WizardStatus::InProgress);
    }

    #[test]
    fn notifying_handler_raises_one_toast() {
        let queue = crate::notify::ToastQueue::new(10);
        let handler = NotifyingSubmissionHandler::new(queue.clone());
        let (mut wizard, _) = wizard();
        wizard.submit_active_step(&values(json!({ "name": "Ada", "bio": "Builds water filters" })));
        wizard.submit_active_step(&opportunity());
        wizard.submit_active_step(&values(json!({
            "walletAddress": "0x1234567890abcdef1234567890abcdef12345678"
        })));
        let StepOutcome::Submitted { application } = wizard.submit_active_step(&values(json!({
            "proofOfIdentity": "passport",
            "proofOfWork": "three wells",
            "agreeToTerms": true
        }))) else {
            panic!("expected submission");
        };

        handler.submit(&application);
        let recent = queue.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "Registration Submitted!");
    }
}
