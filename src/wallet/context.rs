//! WalletContext — app-lifetime facade over the wallet and storage gateways.
//!
//! Every operation resolves to a value: failures come back as `false`,
//! `None` or an empty list, after exactly one destructive notification.
//! Gateway errors are logged with their kind and never propagated.

use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::CryptoCurrency;
use crate::config::NetworkConfig;
use crate::error::WalletError;
use crate::notify::{Notification, Notifier};

use super::gateway::{
    DonationRequest, DonationTransaction, ProofFile, ProofMetadata, StorageGateway,
    TransactionStatus, WalletGateway,
};
use super::state::ConnectionState;

/// Serializable view of the wallet for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    #[serde(flatten)]
    pub connection: ConnectionState,
    pub required_chain_id: u64,
    pub required_chain_name: String,
    /// A donate, upload or verify call is in flight.
    pub busy: bool,
}

/// Connection state plus the id of the connect attempt that owns it.
#[derive(Debug, Default)]
struct Connection {
    state: ConnectionState,
    /// Bumped by every connect and disconnect. A pending connect applies
    /// its session only while its attempt is still current.
    attempt: u64,
}

fn lock(connection: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    connection.lock().unwrap_or_else(|e| e.into_inner())
}

/// Puts an abandoned connect attempt back to `Disconnected` when dropped.
struct ConnectAttempt<'a> {
    connection: &'a Mutex<Connection>,
    attempt: u64,
}

impl Drop for ConnectAttempt<'_> {
    fn drop(&mut self) {
        let mut conn = lock(self.connection);
        if conn.attempt == self.attempt && conn.state == ConnectionState::Connecting {
            debug!(attempt = self.attempt, "Connect abandoned, resetting to disconnected");
            conn.state = ConnectionState::Disconnected;
        }
    }
}

pub struct WalletContext {
    /// Never held across an await.
    connection: Mutex<Connection>,
    wallet: Arc<dyn WalletGateway>,
    storage: Arc<dyn StorageGateway>,
    notifier: Arc<dyn Notifier>,
    network: NetworkConfig,
    /// Held for the duration of one donate, upload or verify call.
    in_flight: tokio::sync::Mutex<()>,
}

impl WalletContext {
    pub fn new(
        wallet: Arc<dyn WalletGateway>,
        storage: Arc<dyn StorageGateway>,
        notifier: Arc<dyn Notifier>,
        network: NetworkConfig,
    ) -> Self {
        Self {
            connection: Mutex::new(Connection::default()),
            wallet,
            storage,
            notifier,
            network,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    pub async fn connection(&self) -> ConnectionState {
        lock(&self.connection).state.clone()
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub async fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            connection: self.connection().await,
            required_chain_id: self.network.required_chain_id,
            required_chain_name: self.network.required_chain_name(),
            busy: self.in_flight.try_lock().is_err(),
        }
    }

    // ── Connection ──────────────────────────────────────────────────────

    /// Connect through the wallet gateway.
    ///
    /// Lands in `Connected` or, when the wallet is on another chain,
    /// `WrongNetwork`. Already-connected is a no-op. Dropping the returned
    /// future before it completes leaves the wallet `Disconnected`.
    pub async fn connect(&self) -> bool {
        let attempt = {
            let mut conn = lock(&self.connection);
            if conn.state.is_connected() {
                return true;
            }
            if conn.state == ConnectionState::Connecting {
                debug!("Connect ignored, already connecting");
                return false;
            }
            conn.state = ConnectionState::Connecting;
            conn.attempt += 1;
            conn.attempt
        };
        let _reset = ConnectAttempt {
            connection: &self.connection,
            attempt,
        };

        let result = self.bounded(self.wallet.connect(), WalletError::Timeout).await;
        let mut conn = lock(&self.connection);
        if conn.attempt != attempt {
            debug!(attempt, "Discarding result of a superseded connect");
            return false;
        }
        match result {
            Ok(session) => {
                info!(
                    gateway = self.wallet.name(),
                    account = %session.account,
                    chain_id = session.chain_id,
                    "Wallet connected"
                );
                conn.state = ConnectionState::from_session(session, self.network.required_chain_id);
                if conn.state.is_wrong_network() {
                    warn!(
                        required = self.network.required_chain_id,
                        "Wallet is on the wrong network"
                    );
                }
                true
            }
            Err(e) => {
                warn!(
                    gateway = self.wallet.name(),
                    kind = e.kind(),
                    error = %e,
                    "Wallet connection failed"
                );
                conn.state = ConnectionState::Disconnected;
                drop(conn);
                self.fail(
                    "Connection Failed",
                    "Could not connect to your wallet. Please try again.",
                );
                false
            }
        }
    }

    /// Forget the session. The state is `Disconnected` afterwards even if
    /// the gateway reports an error; the return value says whether it did.
    /// A connect still in flight is superseded and will not apply.
    pub async fn disconnect(&self) -> bool {
        {
            let mut conn = lock(&self.connection);
            if conn.state == ConnectionState::Disconnected {
                return true;
            }
            conn.state = ConnectionState::Disconnected;
            conn.attempt += 1;
        }
        match self.bounded(self.wallet.disconnect(), WalletError::Timeout).await {
            Ok(()) => {
                info!(gateway = self.wallet.name(), "Wallet disconnected");
                true
            }
            Err(e) => {
                warn!(
                    gateway = self.wallet.name(),
                    kind = e.kind(),
                    error = %e,
                    "Wallet disconnect failed"
                );
                false
            }
        }
    }

    /// Move a `WrongNetwork` wallet onto the required chain.
    pub async fn switch_network(&self) -> bool {
        let account = match self.connection().await {
            ConnectionState::Connected { .. } => return true,
            ConnectionState::WrongNetwork { account, .. } => account,
            ConnectionState::Disconnected | ConnectionState::Connecting => {
                self.fail("Wallet Not Connected", "Please connect your wallet first.");
                return false;
            }
        };

        if !self.wallet.supports_network_switch() {
            self.fail(
                "Network Switch Unavailable",
                "Unable to switch networks automatically. Please switch manually in your wallet.",
            );
            return false;
        }

        let required = self.network.required_chain_id;
        let result = self
            .bounded(self.wallet.switch_network(required), WalletError::Timeout)
            .await;

        let error = match result {
            Ok(chain_id) if chain_id == required => {
                let mut conn = lock(&self.connection);
                // Only the session that asked for the switch is promoted.
                if conn.state.account() == Some(account.as_str()) {
                    conn.state = ConnectionState::Connected { account, chain_id };
                }
                info!(chain_id, "Switched to required network");
                return true;
            }
            Ok(chain_id) => {
                WalletError::Network(format!("wallet reported chain {chain_id} after switch"))
            }
            Err(e) => e,
        };

        warn!(kind = error.kind(), error = %error, required, "Network switch failed");
        self.fail(
            "Network Switch Failed",
            format!(
                "Failed to switch to {}. Please try manually.",
                self.network.required_chain_name()
            ),
        );
        false
    }

    // ── Donations ───────────────────────────────────────────────────────

    /// Donate `amount` ETH and announce success.
    pub async fn donate(
        &self,
        opportunity_id: &str,
        amount: &str,
        recipient_address: &str,
    ) -> Option<DonationTransaction> {
        let parsed = match Decimal::from_str(amount.trim()) {
            Ok(n) if n > Decimal::ZERO => n,
            _ => {
                let e = WalletError::InvalidAmount(amount.to_string());
                warn!(kind = e.kind(), error = %e, "Donation rejected before sending");
                self.fail_donation();
                return None;
            }
        };
        let transaction = self
            .donate_in(CryptoCurrency::Eth, opportunity_id, parsed, recipient_address)
            .await?;
        self.notifier.notify(Notification::info(
            "Donation Successful",
            "Your donation has been processed successfully.",
        ));
        Some(transaction)
    }

    /// Donate in `currency`. Failures notify; success is left to the caller
    /// to announce.
    pub async fn donate_in(
        &self,
        currency: CryptoCurrency,
        opportunity_id: &str,
        amount: Decimal,
        recipient_address: &str,
    ) -> Option<DonationTransaction> {
        let _guard = self.begin_operation()?;

        match self.connection().await {
            ConnectionState::Connected { .. } => {}
            ConnectionState::WrongNetwork { .. } => {
                self.fail(
                    "Wrong Network",
                    format!(
                        "Please switch to {} to donate.",
                        self.network.required_chain_name()
                    ),
                );
                return None;
            }
            ConnectionState::Disconnected | ConnectionState::Connecting => {
                self.fail("Wallet Not Connected", "Please connect your wallet to donate.");
                return None;
            }
        }

        let request = self.donation_request(currency, opportunity_id, amount, recipient_address);
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                warn!(
                    kind = e.kind(),
                    error = %e,
                    opportunity_id,
                    "Donation rejected before sending"
                );
                self.fail_donation();
                return None;
            }
        };

        match self
            .bounded(self.wallet.send_donation(&request), WalletError::Timeout)
            .await
        {
            Ok(receipt) => {
                info!(
                    opportunity_id,
                    amount = %amount,
                    currency = %currency,
                    tx = %receipt.transaction_hash,
                    "Donation confirmed"
                );
                Some(DonationTransaction {
                    opportunity_id: request.opportunity_id,
                    amount,
                    currency,
                    recipient_address: request.recipient_address,
                    timestamp: Utc::now(),
                    transaction_hash: receipt.transaction_hash,
                    status: TransactionStatus::Confirmed,
                })
            }
            Err(e) => {
                warn!(
                    gateway = self.wallet.name(),
                    kind = e.kind(),
                    error = %e,
                    opportunity_id,
                    "Donation failed"
                );
                self.fail_donation();
                None
            }
        }
    }

    fn donation_request(
        &self,
        currency: CryptoCurrency,
        opportunity_id: &str,
        amount: Decimal,
        recipient_address: &str,
    ) -> Result<DonationRequest, WalletError> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::InvalidAmount(amount.to_string()));
        }
        if recipient_address.trim().is_empty() {
            return Err(WalletError::InvalidRecipient(recipient_address.to_string()));
        }
        let token = self.network.tokens.get(currency.as_str()).ok_or_else(|| {
            WalletError::Unavailable(format!("{currency} is not accepted by the contract"))
        })?;
        let amount_base_units = Decimal::TEN
            .checked_powu(u64::from(token.decimals))
            .and_then(|scale| amount.checked_mul(scale))
            .ok_or_else(|| {
                WalletError::InvalidAmount(format!("{amount} {currency} is out of range"))
            })?;

        Ok(DonationRequest {
            opportunity_id: opportunity_id.to_string(),
            recipient_address: recipient_address.to_string(),
            contract_address: self.network.contract_address.clone(),
            currency,
            token_address: token.address.clone(),
            amount,
            amount_base_units,
        })
    }

    // ── Proofs ──────────────────────────────────────────────────────────

    /// Upload proof files; returns one content id per file, or nothing.
    pub async fn upload_proof(&self, files: &[ProofFile], metadata: &ProofMetadata) -> Vec<String> {
        if files.is_empty() {
            self.fail("No Files Selected", "Please select at least one file to upload.");
            return Vec::new();
        }
        let Some(_guard) = self.begin_operation() else {
            return Vec::new();
        };

        let result = self
            .bounded(
                self.storage.upload(files, metadata),
                crate::error::StorageError::Timeout,
            )
            .await;
        match result {
            Ok(cids) if cids.len() == files.len() => {
                info!(
                    gateway = self.storage.name(),
                    opportunity_id = %metadata.opportunity_id,
                    files = files.len(),
                    "Proof uploaded"
                );
                self.notifier.notify(Notification::info(
                    "Proof Uploaded",
                    format!(
                        "Successfully uploaded {} file(s) to decentralized storage.",
                        files.len()
                    ),
                ));
                cids
            }
            Ok(cids) => {
                warn!(
                    gateway = self.storage.name(),
                    expected = files.len(),
                    got = cids.len(),
                    "Upload returned the wrong number of content ids"
                );
                self.fail_upload();
                Vec::new()
            }
            Err(e) => {
                warn!(
                    gateway = self.storage.name(),
                    kind = e.kind(),
                    error = %e,
                    "Proof upload failed"
                );
                self.fail_upload();
                Vec::new()
            }
        }
    }

    /// Whether `cid` resolves in decentralized storage.
    pub async fn verify_proof(&self, cid: &str) -> bool {
        let Some(_guard) = self.begin_operation() else {
            return false;
        };
        match self
            .bounded(self.storage.verify(cid), crate::error::StorageError::Timeout)
            .await
        {
            Ok(found) => {
                debug!(cid, found, "Proof verified");
                found
            }
            Err(e) => {
                warn!(
                    gateway = self.storage.name(),
                    kind = e.kind(),
                    error = %e,
                    cid,
                    "Proof verification failed"
                );
                self.fail(
                    "Verification Failed",
                    "Failed to verify proof in decentralized storage.",
                );
                false
            }
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    /// Take the in-flight slot, or notify and return `None` when another
    /// operation holds it. The slot is released when the guard drops.
    fn begin_operation(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match self.in_flight.try_lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                debug!("Operation rejected, another one is in flight");
                self.fail(
                    "Operation In Progress",
                    "Please wait for the current operation to finish.",
                );
                None
            }
        }
    }

    /// Run a gateway call under the configured operation timeout.
    async fn bounded<T, E, F>(&self, call: F, on_timeout: fn(Duration) -> E) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let limit = self.network.operation_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(limit)),
        }
    }

    fn fail(&self, title: &str, description: impl Into<String>) {
        self.notifier.notify(Notification::destructive(title, description));
    }

    fn fail_donation(&self) {
        self.fail(
            "Donation Failed",
            "There was an error processing your donation. Please try again.",
        );
    }

    fn fail_upload(&self) {
        self.fail("Upload Failed", "Failed to upload proof to decentralized storage.");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::StorageError;
    use crate::notify::{Severity, ToastQueue};
    use crate::wallet::gateway::{TransactionReceipt, WalletSession};

    const RECIPIENT: &str = "0x1234567890abcdef1234567890abcdef12345678";

    /// Wallet whose behavior is fixed per test.
    struct FakeWallet {
        chain_id: u64,
        switch_supported: bool,
        fail_connect: bool,
        fail_donation: bool,
        /// When set, the first `connect` sleeps this long.
        first_connect_delay: Option<Duration>,
        connects: AtomicUsize,
        /// When set, `send_donation` waits for this before returning.
        gate: Option<Arc<Notify>>,
        donations: AtomicUsize,
    }

    impl FakeWallet {
        fn on_chain(chain_id: u64) -> Self {
            Self {
                chain_id,
                switch_supported: true,
                fail_connect: false,
                fail_donation: false,
                first_connect_delay: None,
                connects: AtomicUsize::new(0),
                gate: None,
                donations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WalletGateway for FakeWallet {
        fn name(&self) -> &str {
            "fake"
        }

        async fn connect(&self) -> Result<WalletSession, WalletError> {
            let previous = self.connects.fetch_add(1, Ordering::SeqCst);
            if let (0, Some(delay)) = (previous, self.first_connect_delay) {
                tokio::time::sleep(delay).await;
            }
            if self.fail_connect {
                return Err(WalletError::Rejected("user closed the modal".into()));
            }
            Ok(WalletSession {
                account: "0xdonor".into(),
                chain_id: self.chain_id,
            })
        }

        async fn disconnect(&self) -> Result<(), WalletError> {
            Ok(())
        }

        fn supports_network_switch(&self) -> bool {
            self.switch_supported
        }

        async fn switch_network(&self, chain_id: u64) -> Result<u64, WalletError> {
            Ok(chain_id)
        }

        async fn send_donation(
            &self,
            request: &DonationRequest,
        ) -> Result<TransactionReceipt, WalletError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.donations.fetch_add(1, Ordering::SeqCst);
            if self.fail_donation {
                return Err(WalletError::Network("rpc down".into()));
            }
            Ok(TransactionReceipt {
                transaction_hash: format!("0xtx-{}", request.opportunity_id),
            })
        }
    }

    struct FakeStorage {
        fail: bool,
        hang: bool,
    }

    #[async_trait]
    impl StorageGateway for FakeStorage {
        fn name(&self) -> &str {
            "fake-storage"
        }

        async fn upload(
            &self,
            files: &[ProofFile],
            _metadata: &ProofMetadata,
        ) -> Result<Vec<String>, StorageError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(StorageError::UploadFailed("gateway 500".into()));
            }
            Ok(files.iter().map(|f| format!("Qm{}", f.name)).collect())
        }

        async fn verify(&self, cid: &str) -> Result<bool, StorageError> {
            Ok(cid.starts_with("Qm"))
        }
    }

    fn context(wallet: FakeWallet, storage: FakeStorage) -> (Arc<WalletContext>, Arc<ToastQueue>) {
        let toasts = ToastQueue::new(20);
        let network = NetworkConfig {
            operation_timeout: Duration::from_millis(200),
            ..NetworkConfig::default()
        };
        let ctx = WalletContext::new(Arc::new(wallet), Arc::new(storage), toasts.clone(), network);
        (Arc::new(ctx), toasts)
    }

    fn storage() -> FakeStorage {
        FakeStorage {
            fail: false,
            hang: false,
        }
    }

    fn titles(toasts: &ToastQueue) -> Vec<String> {
        toasts.recent().into_iter().map(|n| n.title).collect()
    }

    fn file(name: &str) -> ProofFile {
        ProofFile {
            name: name.into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn connect_on_required_chain() {
        let (ctx, toasts) = context(FakeWallet::on_chain(80001), storage());
        assert!(ctx.connect().await);
        assert!(matches!(ctx.connection().await, ConnectionState::Connected { .. }));
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn connect_on_other_chain_then_switch() {
        let (ctx, _) = context(FakeWallet::on_chain(1), storage());
        assert!(ctx.connect().await);
        assert!(ctx.connection().await.is_wrong_network());

        assert!(ctx.switch_network().await);
        assert_eq!(
            ctx.connection().await,
            ConnectionState::Connected {
                account: "0xdonor".into(),
                chain_id: 80001
            }
        );
        // Already connected: no-op
        assert!(ctx.switch_network().await);
    }

    #[tokio::test]
    async fn connect_failure_notifies_and_resets() {
        let wallet = FakeWallet {
            fail_connect: true,
            ..FakeWallet::on_chain(80001)
        };
        let (ctx, toasts) = context(wallet, storage());
        assert!(!ctx.connect().await);
        assert_eq!(ctx.connection().await, ConnectionState::Disconnected);
        assert_eq!(titles(&toasts), vec!["Connection Failed"]);
    }

    #[tokio::test]
    async fn cancelled_connect_can_be_retried() {
        let wallet = FakeWallet {
            first_connect_delay: Some(Duration::from_secs(1)),
            ..FakeWallet::on_chain(80001)
        };
        let (ctx, toasts) = context(wallet, storage());

        let cancelled = tokio::time::timeout(Duration::from_millis(20), ctx.connect()).await;
        assert!(cancelled.is_err());
        assert_eq!(ctx.connection().await, ConnectionState::Disconnected);

        assert!(ctx.connect().await);
        assert!(matches!(ctx.connection().await, ConnectionState::Connected { .. }));
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn disconnect_during_connect_wins() {
        let wallet = FakeWallet {
            first_connect_delay: Some(Duration::from_millis(100)),
            ..FakeWallet::on_chain(80001)
        };
        let (ctx, toasts) = context(wallet, storage());

        let pending = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.connect().await })
        };
        while ctx.connection().await != ConnectionState::Connecting {
            tokio::task::yield_now().await;
        }

        assert!(ctx.disconnect().await);
        assert!(!pending.await.unwrap());
        assert_eq!(ctx.connection().await, ConnectionState::Disconnected);
        assert!(toasts.is_empty());

        // A fresh connect afterwards is unaffected.
        assert!(ctx.connect().await);
        assert!(ctx.connection().await.is_connected());
    }

    #[tokio::test]
    async fn switch_unavailable_is_reported() {
        let wallet = FakeWallet {
            switch_supported: false,
            ..FakeWallet::on_chain(5)
        };
        let (ctx, toasts) = context(wallet, storage());
        ctx.connect().await;
        assert!(!ctx.switch_network().await);
        assert!(ctx.connection().await.is_wrong_network());
        assert_eq!(titles(&toasts), vec!["Network Switch Unavailable"]);
    }

    #[tokio::test]
    async fn switch_while_disconnected_is_false() {
        let (ctx, toasts) = context(FakeWallet::on_chain(80001), storage());
        assert!(!ctx.switch_network().await);
        assert_eq!(titles(&toasts), vec!["Wallet Not Connected"]);
    }

    #[tokio::test]
    async fn disconnect_from_any_state() {
        let (ctx, _) = context(FakeWallet::on_chain(1), storage());
        ctx.connect().await;
        assert!(ctx.disconnect().await);
        assert_eq!(ctx.connection().await, ConnectionState::Disconnected);
        assert!(ctx.disconnect().await);
    }

    #[tokio::test]
    async fn donate_requires_connection() {
        let (ctx, toasts) = context(FakeWallet::on_chain(80001), storage());
        assert!(ctx.donate("1", "0.5", RECIPIENT).await.is_none());
        assert_eq!(titles(&toasts), vec!["Wallet Not Connected"]);
    }

    #[tokio::test]
    async fn donate_on_wrong_network_is_refused() {
        let (ctx, toasts) = context(FakeWallet::on_chain(137), storage());
        ctx.connect().await;
        assert!(ctx.donate("1", "0.5", RECIPIENT).await.is_none());
        let recent = toasts.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "Wrong Network");
        assert!(recent[0].description.contains("Mumbai Testnet"));
    }

    #[tokio::test]
    async fn successful_donation_is_confirmed() {
        let (ctx, toasts) = context(FakeWallet::on_chain(80001), storage());
        ctx.connect().await;
        let tx = ctx.donate("3", "0.25", RECIPIENT).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Confirmed);
        assert_eq!(tx.currency, CryptoCurrency::Eth);
        assert_eq!(tx.amount, dec!(0.25));
        assert_eq!(tx.transaction_hash, "0xtx-3");
        assert_eq!(titles(&toasts), vec!["Donation Successful"]);
    }

    #[tokio::test]
    async fn failed_donation_returns_none_with_one_failure() {
        let wallet = FakeWallet {
            fail_donation: true,
            ..FakeWallet::on_chain(80001)
        };
        let (ctx, toasts) = context(wallet, storage());
        ctx.connect().await;
        assert!(ctx.donate("1", "1", RECIPIENT).await.is_none());

        let recent = toasts.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].title, "Donation Failed");
        assert_eq!(recent[0].severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn invalid_amount_never_reaches_gateway() {
        let (ctx, toasts) = context(FakeWallet::on_chain(80001), storage());
        ctx.connect().await;
        assert!(ctx.donate("1", "abc", RECIPIENT).await.is_none());
        assert!(ctx.donate("1", "-1", RECIPIENT).await.is_none());
        assert_eq!(titles(&toasts), vec!["Donation Failed", "Donation Failed"]);
    }

    #[tokio::test]
    async fn second_concurrent_operation_is_rejected() {
        let gate = Arc::new(Notify::new());
        let wallet = FakeWallet {
            gate: Some(gate.clone()),
            ..FakeWallet::on_chain(80001)
        };
        let (ctx, toasts) = context(wallet, storage());
        ctx.connect().await;

        let first = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                ctx.donate_in(CryptoCurrency::Eth, "1", dec!(1), RECIPIENT).await
            })
        };
        // Let the first call take the slot.
        while !ctx.snapshot().await.busy {
            tokio::task::yield_now().await;
        }

        assert!(!ctx.verify_proof("QmAbc").await);
        assert_eq!(titles(&toasts), vec!["Operation In Progress"]);

        gate.notify_one();
        assert!(first.await.unwrap().is_some());
        assert!(!ctx.snapshot().await.busy);
        assert!(ctx.verify_proof("QmAbc").await);
    }

    #[tokio::test]
    async fn upload_without_files_is_refused() {
        let (ctx, toasts) = context(FakeWallet::on_chain(80001), storage());
        let cids = ctx.upload_proof(&[], &ProofMetadata::project_proof("1")).await;
        assert!(cids.is_empty());
        assert_eq!(titles(&toasts), vec!["No Files Selected"]);
    }

    #[tokio::test]
    async fn upload_returns_one_cid_per_file() {
        let (ctx, toasts) = context(FakeWallet::on_chain(80001), storage());
        let cids = ctx
            .upload_proof(&[file("a"), file("b")], &ProofMetadata::project_proof("1"))
            .await;
        assert_eq!(cids, vec!["Qma", "Qmb"]);
        let recent = toasts.recent();
        assert_eq!(recent[0].title, "Proof Uploaded");
        assert!(recent[0].description.contains("2 file(s)"));
    }

    #[tokio::test]
    async fn upload_failure_is_one_notification() {
        let (ctx, toasts) = context(
            FakeWallet::on_chain(80001),
            FakeStorage {
                fail: true,
                hang: false,
            },
        );
        let metadata = ProofMetadata::project_proof("1");
        assert!(ctx.upload_proof(&[file("a")], &metadata).await.is_empty());
        assert_eq!(titles(&toasts), vec!["Upload Failed"]);
    }

    #[tokio::test]
    async fn hung_upload_times_out_and_releases_slot() {
        let (ctx, toasts) = context(
            FakeWallet::on_chain(80001),
            FakeStorage {
                fail: false,
                hang: true,
            },
        );
        let metadata = ProofMetadata::project_proof("1");
        assert!(ctx.upload_proof(&[file("a")], &metadata).await.is_empty());
        assert_eq!(titles(&toasts), vec!["Upload Failed"]);
        assert!(!ctx.snapshot().await.busy);
    }

    #[test]
    fn donation_request_scales_by_token_decimals() {
        let (ctx, _) = context(FakeWallet::on_chain(80001), storage());
        let request = ctx
            .donation_request(CryptoCurrency::Usdc, "1", dec!(2.5), RECIPIENT)
            .unwrap();
        assert_eq!(request.amount_base_units, dec!(2500000));
        assert_eq!(request.token_address, "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174");

        let eth = ctx.donation_request(CryptoCurrency::Eth, "1", dec!(1), RECIPIENT).unwrap();
        assert_eq!(eth.token_address, "0x0000000000000000000000000000000000000000");
    }

    #[test]
    fn proof_metadata_uses_type_key() {
        let json = serde_json::to_value(ProofMetadata::project_proof("7")).unwrap();
        assert_eq!(json["type"], "project_proof");
        assert_eq!(json["opportunityId"], "7");
    }
}
