//! Error types for chain access and the session workflow.

use thiserror::Error;

/// Failure reported by a wallet provider or contract implementation.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport or node-side failure of an RPC call.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The transaction was mined but reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(String),
}

impl From<alloy::transports::TransportError> for ChainError {
    fn from(err: alloy::transports::TransportError) -> Self {
        Self::Rpc(err.to_string())
    }
}

impl From<alloy::contract::Error> for ChainError {
    fn from(err: alloy::contract::Error) -> Self {
        Self::Rpc(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for ChainError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        Self::Rpc(err.to_string())
    }
}

/// Failure of a step in the session workflow.
///
/// Each variant maps to one blocking or retryable condition of the load and
/// mint sequence; callers can match on the variant to decide how to present
/// it.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No reachable wallet provider at the probed endpoint. Blocks every
    /// downstream step.
    #[error("no wallet provider detected at {endpoint}")]
    ProviderNotFound {
        endpoint: String,
        source: ChainError,
    },

    /// The wallet exposed an empty account list.
    #[error("wallet exposes no accounts")]
    NoAccount,

    /// The artifact has no deployment record for the provider's network.
    #[error("contract is not deployed on network {network_id}")]
    ContractNotDeployed { network_id: u64 },

    /// A chain read failed; `op` names the call that failed.
    #[error("{op} read failed")]
    Read {
        op: &'static str,
        source: ChainError,
    },

    /// The mint transaction was rejected on submission or reverted.
    #[error("mint submission failed")]
    MintSubmission(#[source] ChainError),

    /// A mint was attempted before the session was loaded.
    #[error("session is not loaded")]
    NotLoaded,
}
