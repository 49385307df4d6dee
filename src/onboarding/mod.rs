//! Recipient onboarding — a four-step form wizard.
//!
//! Each step has its own rule table ([`steps`]) evaluated by one generic
//! engine ([`schema`]). Accepted steps become typed records ([`model`]) in
//! the wizard's accumulated record; the last step hands the complete
//! application to a [`SubmissionHandler`].

pub mod manager;
pub mod model;
pub mod routes;
pub mod schema;
pub mod state;
pub mod steps;

pub use manager::{
    NotifyingSubmissionHandler, OnboardingWizard, StepOutcome, SubmissionHandler, WizardView,
};
pub use model::{
    AccumulatedRecord, BasicInfo, IdentityVerification, OpportunityDetails, RecipientApplication,
    StepRecord, WalletSetup,
};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use schema::{CandidateValues, FieldErrors, FieldSpec, Schema, validate};
pub use state::{OnboardingStep, WizardState, WizardStatus};
