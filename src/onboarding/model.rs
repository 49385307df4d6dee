//! Typed per-step records and the accumulated application.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{DonationCategory, ProofType};

use super::schema::{self, CandidateValues, FieldErrors};
use super::state::OnboardingStep;

/// Step 1: who the recipient is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub name: String,
    pub bio: String,
}

/// Step 2: the opportunity being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDetails {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub impact: String,
    pub category: DonationCategory,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub is_global: bool,
    pub proof_type: ProofType,
    pub goal_amount: Decimal,
}

/// Step 3: where donations are paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSetup {
    pub wallet_address: String,
    /// Content ids of proofs already uploaded to decentralized storage.
    #[serde(default)]
    pub proof_cids: Vec<String>,
}

/// Step 4: identity and track record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityVerification {
    pub proof_of_identity: String,
    pub proof_of_work: String,
    pub agree_to_terms: bool,
}

/// A validated record for exactly one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRecord {
    BasicInfo(BasicInfo),
    OpportunityDetails(OpportunityDetails),
    WalletSetup(WalletSetup),
    IdentityVerification(IdentityVerification),
}

impl StepRecord {
    /// Validate `candidate` against `step`'s schema and build its record.
    pub fn parse(step: OnboardingStep, candidate: &CandidateValues) -> Result<Self, FieldErrors> {
        let schema = step.schema();
        Ok(match step {
            OnboardingStep::BasicInfo => Self::BasicInfo(schema::parse(schema, candidate)?),
            OnboardingStep::OpportunityDetails => {
                Self::OpportunityDetails(schema::parse(schema, candidate)?)
            }
            OnboardingStep::WalletSetup => Self::WalletSetup(schema::parse(schema, candidate)?),
            OnboardingStep::IdentityVerification => {
                Self::IdentityVerification(schema::parse(schema, candidate)?)
            }
        })
    }

    pub fn step(&self) -> OnboardingStep {
        match self {
            Self::BasicInfo(_) => OnboardingStep::BasicInfo,
            Self::OpportunityDetails(_) => OnboardingStep::OpportunityDetails,
            Self::WalletSetup(_) => OnboardingStep::WalletSetup,
            Self::IdentityVerification(_) => OnboardingStep::IdentityVerification,
        }
    }
}

/// Everything collected so far, one slot per step.
///
/// Serializes flat: the JSON form is the union of every completed step's
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatedRecord {
    #[serde(flatten)]
    pub basic_info: Option<BasicInfo>,
    #[serde(flatten)]
    pub opportunity: Option<OpportunityDetails>,
    #[serde(flatten)]
    pub wallet: Option<WalletSetup>,
    #[serde(flatten)]
    pub identity: Option<IdentityVerification>,
}

impl AccumulatedRecord {
    pub fn is_empty(&self) -> bool {
        self.basic_info.is_none()
            && self.opportunity.is_none()
            && self.wallet.is_none()
            && self.identity.is_none()
    }

    /// Replace the slot for the record's step. Other slots are untouched.
    pub fn insert(&mut self, record: StepRecord) {
        match record {
            StepRecord::BasicInfo(r) => self.basic_info = Some(r),
            StepRecord::OpportunityDetails(r) => self.opportunity = Some(r),
            StepRecord::WalletSetup(r) => self.wallet = Some(r),
            StepRecord::IdentityVerification(r) => self.identity = Some(r),
        }
    }

    pub fn has(&self, step: OnboardingStep) -> bool {
        match step {
            OnboardingStep::BasicInfo => self.basic_info.is_some(),
            OnboardingStep::OpportunityDetails => self.opportunity.is_some(),
            OnboardingStep::WalletSetup => self.wallet.is_some(),
            OnboardingStep::IdentityVerification => self.identity.is_some(),
        }
    }

    /// Field values stored for `step`, empty if the step was never completed.
    pub fn values_for(&self, step: OnboardingStep) -> Map<String, Value> {
        let value = match step {
            OnboardingStep::BasicInfo => self.basic_info.as_ref().map(serde_json::to_value),
            OnboardingStep::OpportunityDetails => {
                self.opportunity.as_ref().map(serde_json::to_value)
            }
            OnboardingStep::WalletSetup => self.wallet.as_ref().map(serde_json::to_value),
            OnboardingStep::IdentityVerification => {
                self.identity.as_ref().map(serde_json::to_value)
            }
        };
        match value {
            Some(Ok(Value::Object(map))) => map,
            Some(Err(e)) => {
                tracing::warn!(step = %step, error = %e, "Failed to serialize stored step values");
                Map::new()
            }
            _ => Map::new(),
        }
    }

    /// The full application, once every step has a record.
    pub fn complete(&self) -> Option<RecipientApplication> {
        Some(RecipientApplication {
            basic_info: self.basic_info.clone()?,
            opportunity: self.opportunity.clone()?,
            wallet: self.wallet.clone()?,
            identity: self.identity.clone()?,
        })
    }
}

/// A finished onboarding application handed to the submission handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientApplication {
    #[serde(flatten)]
    pub basic_info: BasicInfo,
    #[serde(flatten)]
    pub opportunity: OpportunityDetails,
    #[serde(flatten)]
    pub wallet: WalletSetup,
    #[serde(flatten)]
    pub identity: IdentityVerification,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn basic() -> BasicInfo {
        BasicInfo {
            name: "Ada".into(),
            bio: "Builds water filters".into(),
        }
    }

    fn opportunity() -> OpportunityDetails {
        OpportunityDetails {
            title: "Wells".into(),
            summary: "s".repeat(20),
            description: "d".repeat(50),
            impact: "i".repeat(20),
            category: DonationCategory::EmergencyRelief,
            country: "Peru".into(),
            city: None,
            is_global: false,
            proof_type: ProofType::Video,
            goal_amount: dec!(500),
        }
    }

    #[test]
    fn insert_replaces_only_its_slot() {
        let mut record = AccumulatedRecord::default();
        assert!(record.is_empty());
        record.insert(StepRecord::BasicInfo(basic()));
        record.insert(StepRecord::OpportunityDetails(opportunity()));

        let renamed = BasicInfo {
            name: "Grace".into(),
            ..basic()
        };
        record.insert(StepRecord::BasicInfo(renamed));

        assert_eq!(record.basic_info.as_ref().unwrap().name, "Grace");
        assert_eq!(record.opportunity, Some(opportunity()));
        assert!(!record.has(OnboardingStep::WalletSetup));
    }

    #[test]
    fn record_serializes_as_flat_union() {
        let mut record = AccumulatedRecord::default();
        record.insert(StepRecord::BasicInfo(basic()));
        record.insert(StepRecord::OpportunityDetails(opportunity()));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["goalAmount"], "500");
        assert_eq!(value["category"], "Emergency Relief");
        assert!(value.get("walletAddress").is_none());
        assert!(value.get("city").is_none());
    }

    #[test]
    fn values_for_missing_step_is_empty() {
        let record = AccumulatedRecord::default();
        assert!(record.values_for(OnboardingStep::IdentityVerification).is_empty());
    }

    #[test]
    fn complete_requires_every_slot() {
        let mut record = AccumulatedRecord::default();
        record.insert(StepRecord::BasicInfo(basic()));
        record.insert(StepRecord::OpportunityDetails(opportunity()));
        record.insert(StepRecord::WalletSetup(WalletSetup {
            wallet_address: "0x1234567890abcdef1234567890abcdef12345678".into(),
            proof_cids: vec![],
        }));
        assert!(record.complete().is_none());

        record.insert(StepRecord::IdentityVerification(IdentityVerification {
            proof_of_identity: "passport".into(),
            proof_of_work: "15 wells".into(),
            agree_to_terms: true,
        }));
        let application = record.complete().unwrap();
        let value = serde_json::to_value(&application).unwrap();
        assert_eq!(value["agreeToTerms"], true);
        assert_eq!(value["proofCids"], json!([]));
    }

    #[test]
    fn parse_builds_typed_record() {
        let candidate = json!({ "name": "Ada", "bio": "Builds water filters" });
        let record =
            StepRecord::parse(OnboardingStep::BasicInfo, candidate.as_object().unwrap()).unwrap();
        assert_eq!(record, StepRecord::BasicInfo(basic()));
        assert_eq!(record.step(), OnboardingStep::BasicInfo);
    }
}
