//! Wallet connection state.

use serde::{Deserialize, Serialize};

use super::gateway::WalletSession;

/// Where the wallet connection stands.
///
/// `WrongNetwork` is a connected state on the wrong chain; it only returns
/// to `Connected` through a successful network switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    #[serde(rename_all = "camelCase")]
    Connected { account: String, chain_id: u64 },
    #[serde(rename_all = "camelCase")]
    WrongNetwork {
        account: String,
        chain_id: u64,
        required_chain_id: u64,
    },
}

impl ConnectionState {
    /// State after a session is established against `required_chain_id`.
    pub fn from_session(session: WalletSession, required_chain_id: u64) -> Self {
        if session.chain_id == required_chain_id {
            Self::Connected {
                account: session.account,
                chain_id: session.chain_id,
            }
        } else {
            Self::WrongNetwork {
                account: session.account,
                chain_id: session.chain_id,
                required_chain_id,
            }
        }
    }

    /// Connected to any chain.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. } | Self::WrongNetwork { .. })
    }

    pub fn is_wrong_network(&self) -> bool {
        matches!(self, Self::WrongNetwork { .. })
    }

    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Connected { account, .. } | Self::WrongNetwork { account, .. } => Some(account),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(chain_id: u64) -> WalletSession {
        WalletSession {
            account: "0xabc".into(),
            chain_id,
        }
    }

    #[test]
    fn matching_chain_is_connected() {
        let state = ConnectionState::from_session(session(80001), 80001);
        assert!(state.is_connected());
        assert!(!state.is_wrong_network());
        assert_eq!(state.account(), Some("0xabc"));
    }

    #[test]
    fn other_chain_is_wrong_network() {
        let state = ConnectionState::from_session(session(1), 80001);
        assert!(state.is_connected());
        assert!(state.is_wrong_network());
        assert!(matches!(state, ConnectionState::WrongNetwork { chain_id: 1, .. }));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(ConnectionState::from_session(session(1), 80001)).unwrap();
        assert_eq!(json["status"], "wrong_network");
        assert_eq!(json["requiredChainId"], 80001);

        let json = serde_json::to_value(ConnectionState::Disconnected).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "disconnected" }));
    }
}
