//! Collaborator traits for the wallet provider and the KryptoBird contract.
//!
//! The session layer only ever talks to the chain through these traits. The
//! [`provider`](crate::provider) module implements them over JSON-RPC; the
//! `mock-chain` crate implements them in memory for tests.

use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::error::ChainError;

/// `Transfer` event data decoded from a mint receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenTransfer {
    pub from: Address,
    pub to: Address,
    pub token_id: U256,
}

/// Outcome of a confirmed mint transaction.
#[derive(Clone, Debug)]
pub struct MintReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    /// The decoded transfer, when the receipt carried one.
    pub transfer: Option<TokenTransfer>,
}

/// A reachable wallet provider.
///
/// Covers the three capabilities the workflow needs: listing accounts,
/// resolving the network id, and binding contract handles.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the wallet exposes. The first entry is treated as active.
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    /// The provider's network id (`net_version`), which keys rows in the
    /// deployment artifact.
    async fn network_id(&self) -> Result<u64, ChainError>;

    /// Binds a contract handle at `address` on this provider.
    fn birdz_at(&self, address: Address) -> Arc<dyn BirdzContract>;
}

/// The KryptoBird contract's method set, as the client consumes it.
///
/// Responses are trusted as-is; the contract is the sole authority on token
/// data and mint validity.
#[async_trait]
pub trait BirdzContract: Send + Sync {
    /// Deployment address this handle is bound to.
    fn address(&self) -> Address;

    async fn name(&self) -> Result<String, ChainError>;

    async fn symbol(&self) -> Result<String, ChainError>;

    /// Number of tokens minted so far.
    async fn total_supply(&self) -> Result<u64, ChainError>;

    /// Token URI at storage index `index` (0-based).
    async fn token_at(&self, index: u64) -> Result<String, ChainError>;

    /// Submits a mint of `token_uri` from `from` and awaits the receipt.
    async fn mint(&self, from: Address, token_uri: &str) -> Result<MintReceipt, ChainError>;
}
