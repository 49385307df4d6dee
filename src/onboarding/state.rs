//! Onboarding state machine — which step is active and what has been
//! collected.

use serde::{Deserialize, Serialize};

use super::model::AccumulatedRecord;
use super::schema::Schema;
use super::steps;

/// The steps of the recipient onboarding wizard, in order.
///
/// Progresses linearly: BasicInfo → OpportunityDetails → WalletSetup →
/// IdentityVerification. Back navigation moves one step at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    BasicInfo,
    OpportunityDetails,
    WalletSetup,
    IdentityVerification,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 4] = [
        Self::BasicInfo,
        Self::OpportunityDetails,
        Self::WalletSetup,
        Self::IdentityVerification,
    ];

    /// Number of steps.
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position in the wizard.
    pub fn index(&self) -> usize {
        match self {
            Self::BasicInfo => 0,
            Self::OpportunityDetails => 1,
            Self::WalletSetup => 2,
            Self::IdentityVerification => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Only adjacent steps are reachable.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        self.next() == Some(target) || self.previous() == Some(target)
    }

    pub fn is_first(&self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Information",
            Self::OpportunityDetails => "Opportunity Details",
            Self::WalletSetup => "Wallet Setup",
            Self::IdentityVerification => "Identity Verification",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Tell us about yourself",
            Self::OpportunityDetails => "Describe your project",
            Self::WalletSetup => "Configure your wallet",
            Self::IdentityVerification => "Verify your identity",
        }
    }

    /// Rule table for this step's fields.
    pub fn schema(&self) -> &'static Schema {
        match self {
            Self::BasicInfo => &steps::BASIC_INFO,
            Self::OpportunityDetails => &steps::OPPORTUNITY_DETAILS,
            Self::WalletSetup => &steps::WALLET_SETUP,
            Self::IdentityVerification => &steps::IDENTITY_VERIFICATION,
        }
    }

    /// Progress bar fill for this step, 0 on the first and 100 on the last.
    pub fn progress_percent(&self) -> u32 {
        (self.index() * 100 / (Self::COUNT - 1)) as u32
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BasicInfo => "basic_info",
            Self::OpportunityDetails => "opportunity_details",
            Self::WalletSetup => "wallet_setup",
            Self::IdentityVerification => "identity_verification",
        };
        write!(f, "{s}")
    }
}

/// Whether the application has been handed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    #[default]
    InProgress,
    Submitted,
}

/// Active step plus everything collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub active_step: OnboardingStep,
    pub record: AccumulatedRecord,
    pub status: WizardStatus,
}

impl WizardState {
    /// Move forward one step. Returns an error on the last step.
    pub fn advance(&mut self) -> Result<OnboardingStep, String> {
        let next = self
            .active_step
            .next()
            .ok_or_else(|| "Already at the last step".to_string())?;
        if !self.active_step.can_transition_to(next) {
            return Err(format!("Cannot transition from {} to {}", self.active_step, next));
        }
        self.active_step = next;
        Ok(next)
    }

    /// Move back one step. `None` (and no change) on the first step.
    pub fn retreat(&mut self) -> Option<OnboardingStep> {
        let previous = self.active_step.previous()?;
        self.active_step = previous;
        Some(previous)
    }

    pub fn is_submitted(&self) -> bool {
        self.status == WizardStatus::Submitted
    }
}
