//! Simulated gateways for running without a real wallet or IPFS node.
//!
//! Both sleep for a configurable latency and fabricate identifiers, so the
//! rest of the app sees realistic timing and shapes.

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{StorageError, WalletError};

use super::gateway::{
    DonationRequest, ProofFile, ProofMetadata, StorageGateway, TransactionReceipt, WalletGateway,
    WalletSession,
};

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap());

static CID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Qm[1-9A-HJ-NP-Za-km-z]{44}$").unwrap());

const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn random_hex(bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    let hex: String = (0..bytes).map(|_| format!("{:02x}", rng.r#gen::<u8>())).collect();
    format!("0x{hex}")
}

/// CIDv0-shaped id: "Qm" followed by 44 base58 characters.
fn random_cid() -> String {
    let mut rng = rand::thread_rng();
    let tail: String = (0..44)
        .map(|_| BASE58[rng.gen_range(0..BASE58.len())] as char)
        .collect();
    format!("Qm{tail}")
}

pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// A wallet that accepts every request after a delay.
pub struct SimulatedWallet {
    delay: Duration,
    /// Chain reported on connect; changes on switch.
    chain_id: Mutex<u64>,
    account: Mutex<Option<String>>,
}

impl SimulatedWallet {
    pub fn new(delay: Duration, chain_id: u64) -> Self {
        Self {
            delay,
            chain_id: Mutex::new(chain_id),
            account: Mutex::new(None),
        }
    }

    fn current_chain(&self) -> u64 {
        *self.chain_id.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl WalletGateway for SimulatedWallet {
    fn name(&self) -> &str {
        "simulated-wallet"
    }

    async fn connect(&self) -> Result<WalletSession, WalletError> {
        tokio::time::sleep(self.delay).await;
        let account = random_hex(20);
        *self.account.lock().unwrap_or_else(|e| e.into_inner()) = Some(account.clone());
        Ok(WalletSession {
            account,
            chain_id: self.current_chain(),
        })
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        *self.account.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    async fn switch_network(&self, chain_id: u64) -> Result<u64, WalletError> {
        tokio::time::sleep(self.delay).await;
        *self.chain_id.lock().unwrap_or_else(|e| e.into_inner()) = chain_id;
        debug!(chain_id, "Simulated wallet switched network");
        Ok(chain_id)
    }

    async fn send_donation(
        &self,
        request: &DonationRequest,
    ) -> Result<TransactionReceipt, WalletError> {
        if self.account.lock().unwrap_or_else(|e| e.into_inner()).is_none() {
            return Err(WalletError::Unavailable("no connected account".into()));
        }
        if !is_valid_address(&request.recipient_address) {
            return Err(WalletError::InvalidRecipient(request.recipient_address.clone()));
        }
        if !is_valid_address(&request.token_address) {
            return Err(WalletError::Unavailable(format!(
                "no {} token contract at {}",
                request.currency, request.token_address
            )));
        }
        if request.amount_base_units <= Decimal::ZERO {
            return Err(WalletError::InvalidAmount(request.amount.to_string()));
        }
        tokio::time::sleep(self.delay).await;
        Ok(TransactionReceipt {
            transaction_hash: random_hex(32),
        })
    }
}

/// Storage that remembers what it was given, in memory.
pub struct SimulatedStorage {
    delay: Duration,
    stored: Mutex<HashSet<String>>,
}

impl SimulatedStorage {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            stored: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl StorageGateway for SimulatedStorage {
    fn name(&self) -> &str {
        "simulated-ipfs"
    }

    async fn upload(
        &self,
        files: &[ProofFile],
        metadata: &ProofMetadata,
    ) -> Result<Vec<String>, StorageError> {
        tokio::time::sleep(self.delay).await;
        if let Some(empty) = files.iter().find(|f| f.bytes.is_empty()) {
            return Err(StorageError::UploadFailed(format!("{} is empty", empty.name)));
        }
        let cids: Vec<String> = files.iter().map(|_| random_cid()).collect();
        self.stored
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(cids.iter().cloned());
        debug!(
            opportunity_id = %metadata.opportunity_id,
            kind = %metadata.kind,
            count = cids.len(),
            "Simulated upload stored"
        );
        Ok(cids)
    }

    async fn verify(&self, cid: &str) -> Result<bool, StorageError> {
        tokio::time::sleep(self.delay / 2).await;
        if !CID_RE.is_match(cid) {
            return Err(StorageError::VerificationFailed {
                cid: cid.to_string(),
                reason: "not a CIDv0 content id".to_string(),
            });
        }
        Ok(self.stored.lock().unwrap_or_else(|e| e.into_inner()).contains(cid))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::CryptoCurrency;

    fn request(recipient: &str) -> DonationRequest {
        DonationRequest {
            opportunity_id: "1".into(),
            recipient_address: recipient.into(),
            contract_address: "0x0".into(),
            currency: CryptoCurrency::Eth,
            token_address: "0x0000000000000000000000000000000000000000".into(),
            amount: dec!(0.5),
            amount_base_units: dec!(500000000000000000),
        }
    }

    #[test]
    fn generated_ids_have_expected_shape() {
        let hash = random_hex(32);
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0x"));
        assert!(is_valid_address(&random_hex(20)));

        let cid = random_cid();
        assert_eq!(cid.len(), 46);
        assert!(cid.starts_with("Qm"));
        assert!(!cid.contains('0') && !cid.contains('O') && !cid.contains('l'));
    }

    #[tokio::test]
    async fn wallet_round_trip() {
        let wallet = SimulatedWallet::new(Duration::ZERO, 1);
        let session = wallet.connect().await.unwrap();
        assert_eq!(session.chain_id, 1);
        assert_eq!(wallet.switch_network(80001).await.unwrap(), 80001);

        let receipt = wallet
            .send_donation(&request("0x1234567890abcdef1234567890abcdef12345678"))
            .await
            .unwrap();
        assert_eq!(receipt.transaction_hash.len(), 66);
    }

    #[tokio::test]
    async fn wallet_rejects_bad_recipient_and_disconnected_sends() {
        let wallet = SimulatedWallet::new(Duration::ZERO, 80001);
        let err = wallet.send_donation(&request("0x123")).await.unwrap_err();
        assert_eq!(err.kind(), "unavailable");

        wallet.connect().await.unwrap();
        let err = wallet.send_donation(&request("not-an-address")).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_recipient");

        let mut unknown_token = request("0x1234567890abcdef1234567890abcdef12345678");
        unknown_token.token_address = "0x0".into();
        let err = wallet.send_donation(&unknown_token).await.unwrap_err();
        assert_eq!(err.kind(), "unavailable");
    }

    #[tokio::test]
    async fn storage_verifies_only_what_it_stored() {
        let storage = SimulatedStorage::new(Duration::ZERO);
        let files = vec![ProofFile {
            name: "receipt.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF".to_vec(),
        }];
        let cids = storage
            .upload(&files, &ProofMetadata::project_proof("2"))
            .await
            .unwrap();
        assert_eq!(cids.len(), 1);
        assert!(storage.verify(&cids[0]).await.unwrap());
        assert!(!storage.verify(&random_cid()).await.unwrap());

        let err = storage.verify("QmUnknown").await.unwrap_err();
        assert_eq!(err.kind(), "verification_failed");
    }
}
