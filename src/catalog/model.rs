//! Opportunity, recipient and donor records.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// What a donation opportunity is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationCategory {
    Education,
    Healthcare,
    Environment,
    Technology,
    Community,
    Arts,
    #[serde(rename = "Emergency Relief")]
    EmergencyRelief,
    Infrastructure,
    Research,
}

impl DonationCategory {
    pub const ALL: [DonationCategory; 9] = [
        Self::Education,
        Self::Healthcare,
        Self::Environment,
        Self::Technology,
        Self::Community,
        Self::Arts,
        Self::EmergencyRelief,
        Self::Infrastructure,
        Self::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Healthcare => "Healthcare",
            Self::Environment => "Environment",
            Self::Technology => "Technology",
            Self::Community => "Community",
            Self::Arts => "Arts",
            Self::EmergencyRelief => "Emergency Relief",
            Self::Infrastructure => "Infrastructure",
            Self::Research => "Research",
        }
    }
}

impl std::fmt::Display for DonationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DonationCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// What kind of evidence a recipient publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofType {
    Images,
    Text,
    Documents,
    Video,
    Multiple,
}

impl ProofType {
    pub const ALL: [ProofType; 5] = [
        Self::Images,
        Self::Text,
        Self::Documents,
        Self::Video,
        Self::Multiple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Images => "Images",
            Self::Text => "Text",
            Self::Documents => "Documents",
            Self::Video => "Video",
            Self::Multiple => "Multiple",
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProofType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown proof type: {}", s))
    }
}

/// Currencies a donor can pick in the donate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoCurrency {
    Eth,
    Usdc,
    Dai,
}

impl CryptoCurrency {
    /// Currencies offered by the donate form.
    pub const DONATABLE: [CryptoCurrency; 3] = [Self::Eth, Self::Usdc, Self::Dai];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Usdc => "USDC",
            Self::Dai => "DAI",
        }
    }
}

impl Default for CryptoCurrency {
    fn default() -> Self {
        Self::Eth
    }
}

impl std::fmt::Display for CryptoCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CryptoCurrency {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ETH" => Ok(Self::Eth),
            "USDC" => Ok(Self::Usdc),
            "DAI" => Ok(Self::Dai),
            _ => Err(format!("Unknown currency: {}", s)),
        }
    }
}

/// Where an opportunity takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geography {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Global initiatives match every country filter.
    pub global: bool,
}

/// A fundable cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationOpportunity {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: DonationCategory,
    pub location: Geography,
    pub proof_type: ProofType,
    pub description: String,
    pub proof_urls: Vec<String>,
    pub recipient_address: String,
    pub goal_amount: Decimal,
    pub raised_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub recipient_id: String,
    pub featured: bool,
    /// How $1K could help.
    pub impact: String,
}

impl DonationOpportunity {
    /// Share of the goal raised so far, as a whole percentage (half rounds up).
    pub fn percent_funded(&self) -> u32 {
        if self.goal_amount <= Decimal::ZERO {
            return 0;
        }
        (self.raised_amount / self.goal_amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }
}

/// The verified party behind one or more opportunities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: String,
    pub name: String,
    pub wallet_address: String,
    pub kyc_verified: bool,
    pub biography: String,
    /// IDs of the opportunities this recipient created.
    pub opportunities: Vec<String>,
    pub proof_of_work: String,
    pub created_at: DateTime<Utc>,
}

/// One past donation in a donor's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationHistory {
    pub opportunity_id: String,
    pub amount: Decimal,
    pub currency: CryptoCurrency,
    pub timestamp: DateTime<Utc>,
    pub transaction_hash: String,
}

/// Donor preferences and history shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: String,
    #[serde(default)]
    pub preferred_categories: Vec<DonationCategory>,
    #[serde(default)]
    pub preferred_geographies: Vec<Geography>,
    pub donation_history: Vec<DonationHistory>,
    pub show_active_only: bool,
    pub created_at: DateTime<Utc>,
}

impl Donor {
    /// Sum of all historical donations, regardless of currency.
    pub fn total_donated(&self) -> Decimal {
        self.donation_history.iter().map(|d| d.amount).sum()
    }
}
