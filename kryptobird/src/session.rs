//! Session state and the load / mint workflow.

use std::sync::Arc;

use alloy::primitives::Address;
use tracing::{debug, info};

use crate::{
    artifact::ContractArtifact,
    chain::{BirdzContract, MintReceipt, WalletProvider},
    error::SessionError,
};

/// In-memory state of one wallet-plus-contract session.
///
/// Populated by [`Session::load`], appended to by [`Session::mint`], read by
/// whatever front end owns it. All mutation goes through `&mut self`, so two
/// in-flight operations on one session cannot interleave.
///
/// `tokens.len()` never exceeds `token_count`; it grows toward it during
/// enumeration. The contract handle is bound at most once per session.
#[derive(Default)]
pub struct Session {
    account: Option<Address>,
    contract: Option<Arc<dyn BirdzContract>>,
    token_count: u64,
    tokens: Vec<String>,
}

impl Session {
    /// Creates an empty, unloaded session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active wallet account, once resolved.
    pub fn account(&self) -> Option<Address> {
        self.account
    }

    /// Contract handle, once the deployment lookup has succeeded.
    pub fn contract(&self) -> Option<&Arc<dyn BirdzContract>> {
        self.contract.as_ref()
    }

    /// Total token count reported by the contract, advanced by confirmed
    /// mints.
    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    /// Token URIs in on-chain index order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether a contract handle is bound.
    pub fn is_loaded(&self) -> bool {
        self.contract.is_some()
    }

    /// Runs the load sequence against `provider`.
    ///
    /// Steps, in order: resolve the active account, resolve the network id,
    /// look up the deployment in `artifact`, bind the contract handle, read
    /// the total supply, then read every token URI by ascending index. Each
    /// chain call is awaited before the next one starts.
    ///
    /// A session that already holds a contract handle is not re-bound;
    /// loading again behaves like [`Session::refresh`].
    ///
    /// # Errors
    /// Returns the first failing step's error. State populated by the steps
    /// that already succeeded is kept, so callers can see how far the load
    /// got and retry with another `load` or `refresh`.
    pub async fn load(
        &mut self,
        provider: &dyn WalletProvider,
        artifact: &ContractArtifact,
    ) -> Result<(), SessionError> {
        if self.contract.is_some() {
            return self.refresh().await;
        }

        let accounts = provider.accounts().await.map_err(|source| {
            SessionError::Read {
                op: "accounts",
                source,
            }
        })?;
        let account = *accounts.first().ok_or(SessionError::NoAccount)?;
        self.account = Some(account);
        debug!(%account, "active account resolved");

        let network_id = provider.network_id().await.map_err(|source| {
            SessionError::Read {
                op: "network id",
                source,
            }
        })?;

        let address = artifact
            .deployment(network_id)
            .ok_or(SessionError::ContractNotDeployed { network_id })?;
        self.contract = Some(provider.birdz_at(address));
        info!(%address, network_id, "contract handle bound");

        self.refresh().await
    }

    /// Re-reads the token count and re-enumerates token URIs on the bound
    /// contract handle.
    ///
    /// # Errors
    /// [`SessionError::NotLoaded`] if no contract handle is bound, otherwise
    /// the first failing read. Tokens read before the failure are kept.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let contract = self.contract.clone().ok_or(SessionError::NotLoaded)?;

        let supply = contract.total_supply().await.map_err(|source| {
            SessionError::Read {
                op: "totalSupply",
                source,
            }
        })?;
        self.tokens.clear();
        self.token_count = supply;

        // Token ids start at 1; storage indices at 0.
        for index in 1..=supply {
            let uri = contract.token_at(index - 1).await.map_err(|source| {
                SessionError::Read {
                    op: "kryptoBirdz",
                    source,
                }
            })?;
            self.tokens.push(uri);
        }
        debug!(count = supply, "token enumeration complete");

        Ok(())
    }

    /// Submits a mint for `token_uri` from the active account and awaits the
    /// transaction receipt.
    ///
    /// On confirmation the submitted URI is appended to the token list and
    /// the count advanced. The receipt, including the decoded transfer when
    /// the node returned one, is handed back to the caller.
    ///
    /// # Errors
    /// [`SessionError::NotLoaded`] before a successful load;
    /// [`SessionError::MintSubmission`] if the node rejects the transaction
    /// or the receipt reports a revert. Nothing is appended on failure.
    pub async fn mint(&mut self, token_uri: &str) -> Result<MintReceipt, SessionError> {
        let (account, contract) = match (self.account, self.contract.clone()) {
            (Some(account), Some(contract)) => (account, contract),
            _ => return Err(SessionError::NotLoaded),
        };

        let receipt = contract
            .mint(account, token_uri)
            .await
            .map_err(SessionError::MintSubmission)?;
        info!(tx = %receipt.tx_hash, "mint confirmed");

        // Count before append keeps tokens.len() <= token_count.
        self.token_count += 1;
        self.tokens.push(token_uri.to_owned());

        Ok(receipt)
    }
}
