//! Capability traits for the wallet bridge and decentralized storage.
//!
//! Business logic only talks to these traits. The simulated implementations
//! live in [`super::simulated`]; tests supply their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::CryptoCurrency;
use crate::error::{StorageError, WalletError};

/// An account connected through the wallet bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub account: String,
    pub chain_id: u64,
}

/// A donation ready to be sent to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRequest {
    pub opportunity_id: String,
    pub recipient_address: String,
    pub contract_address: String,
    pub currency: CryptoCurrency,
    /// ERC-20 contract of the token; the zero address for native ETH.
    pub token_address: String,
    /// Amount as entered, in whole tokens.
    pub amount: Decimal,
    /// Amount in the token's smallest unit (wei for ETH).
    pub amount_base_units: Decimal,
}

/// What the chain reports once a donation is mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// The wallet context only hands out mined transactions; failures
    /// come back as `None`.
    Confirmed,
}

/// A completed donation as shown to the donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationTransaction {
    pub opportunity_id: String,
    pub amount: Decimal,
    pub currency: CryptoCurrency,
    pub recipient_address: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_hash: String,
    pub status: TransactionStatus,
}

/// A file selected for proof upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Metadata stored alongside uploaded proof files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofMetadata {
    pub opportunity_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ProofMetadata {
    pub const PROJECT_PROOF: &'static str = "project_proof";

    /// Metadata for proof of project progress, stamped now.
    pub fn project_proof(opportunity_id: impl Into<String>) -> Self {
        Self {
            opportunity_id: opportunity_id.into(),
            timestamp: Utc::now(),
            kind: Self::PROJECT_PROOF.to_string(),
        }
    }
}

/// Bridge to a browser or hardware wallet.
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Gateway name for logs.
    fn name(&self) -> &str;

    /// Ask the user to connect; returns the account and its current chain.
    async fn connect(&self) -> Result<WalletSession, WalletError>;

    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Whether [`WalletGateway::switch_network`] can be called at all.
    fn supports_network_switch(&self) -> bool {
        true
    }

    /// Switch the wallet to `chain_id`; returns the chain now active.
    async fn switch_network(&self, chain_id: u64) -> Result<u64, WalletError>;

    /// Send a donation and wait for it to be mined.
    async fn send_donation(
        &self,
        request: &DonationRequest,
    ) -> Result<TransactionReceipt, WalletError>;
}

/// Content-addressed storage for proof files.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    fn name(&self) -> &str;

    /// Store `files`; returns one content id per file, in order.
    async fn upload(
        &self,
        files: &[ProofFile],
        metadata: &ProofMetadata,
    ) -> Result<Vec<String>, StorageError>;

    /// Whether `cid` resolves to stored content.
    async fn verify(&self, cid: &str) -> Result<bool, StorageError>;
}
