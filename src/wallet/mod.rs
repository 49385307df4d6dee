//! Wallet connection, donations and proof storage.
//!
//! [`WalletContext`] is the only entry point the rest of the app uses. It
//! talks to a [`WalletGateway`] and a [`StorageGateway`]; the
//! [`simulated`] module provides stand-ins for both.

pub mod context;
pub mod gateway;
pub mod routes;
pub mod simulated;
pub mod state;

pub use context::{WalletContext, WalletSnapshot};
pub use gateway::{
    DonationRequest, DonationTransaction, ProofFile, ProofMetadata, StorageGateway,
    TransactionReceipt, TransactionStatus, WalletGateway, WalletSession,
};
pub use routes::{WalletRouteState, wallet_routes};
pub use simulated::{SimulatedStorage, SimulatedWallet};
pub use state::ConnectionState;
