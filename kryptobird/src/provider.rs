//! JSON-RPC implementations of the chain collaborators.
//!
//! [`detect_provider`] probes the configured endpoint and hands back an
//! [`EthProvider`]; contract access goes through [`EthBirdz`], a thin wrapper
//! over bindings generated from the deployed contract's interface.

use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    sol,
};
use async_trait::async_trait;
use tracing::debug;

use crate::{
    chain::{BirdzContract, MintReceipt, TokenTransfer, WalletProvider},
    error::{ChainError, SessionError},
};

sol! {
    #[sol(rpc)]
    interface IKryptoBird {
        /// Emitted on every mint (and any later transfer).
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);

        function name() external view returns (string memory);
        function symbol() external view returns (string memory);

        /// Number of tokens minted so far.
        function totalSupply() external view returns (uint256);

        /// Token URI stored at `index` (0-based).
        function kryptoBirdz(uint256 index) external view returns (string memory);

        /// Mints a new token carrying `tokenUri`.
        function mint(string memory tokenUri) external;
    }
}

/// Settings for reaching the wallet provider endpoint.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// JSON-RPC endpoint URL, e.g. `http://127.0.0.1:7545`.
    pub endpoint: String,
}

/// Probes the configured endpoint and wraps it as a wallet provider.
///
/// Detection connects the transport and issues a `web3_clientVersion`
/// liveness probe; an endpoint that cannot answer it is treated as absent.
///
/// # Arguments
/// * `config` - Endpoint settings to probe
///
/// # Returns
/// An [`EthProvider`] ready for the session loader
///
/// # Errors
/// Returns [`SessionError::ProviderNotFound`] carrying the probed endpoint
/// if the connection or the probe fails
pub async fn detect_provider(config: &ProviderConfig) -> Result<EthProvider, SessionError> {
    let not_found = |source: ChainError| SessionError::ProviderNotFound {
        endpoint: config.endpoint.clone(),
        source,
    };

    let provider = ProviderBuilder::new()
        .connect(&config.endpoint)
        .await
        .map_err(|e| not_found(ChainError::from(e)))?
        .erased();

    let node = provider
        .get_client_version()
        .await
        .map_err(|e| not_found(ChainError::from(e)))?;
    debug!(endpoint = %config.endpoint, %node, "wallet provider detected");

    Ok(EthProvider { provider })
}

/// Wallet provider backed by an Ethereum-style JSON-RPC node.
///
/// Transactions are submitted with `eth_sendTransaction`, so signing stays
/// with the node's unlocked accounts, the same trust model as an injected
/// browser wallet.
#[derive(Clone)]
pub struct EthProvider {
    provider: DynProvider,
}

#[async_trait]
impl WalletProvider for EthProvider {
    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        Ok(self.provider.get_accounts().await?)
    }

    async fn network_id(&self) -> Result<u64, ChainError> {
        Ok(self.provider.get_net_version().await?)
    }

    fn birdz_at(&self, address: Address) -> Arc<dyn BirdzContract> {
        Arc::new(EthBirdz {
            inner: IKryptoBird::new(address, self.provider.clone()),
        })
    }
}

/// Contract handle over the generated RPC bindings.
pub struct EthBirdz {
    inner: IKryptoBird::IKryptoBirdInstance<DynProvider>,
}

#[async_trait]
impl BirdzContract for EthBirdz {
    fn address(&self) -> Address {
        *self.inner.address()
    }

    async fn name(&self) -> Result<String, ChainError> {
        Ok(self.inner.name().call().await?)
    }

    async fn symbol(&self) -> Result<String, ChainError> {
        Ok(self.inner.symbol().call().await?)
    }

    async fn total_supply(&self) -> Result<u64, ChainError> {
        let supply = self.inner.totalSupply().call().await?;
        u64::try_from(supply)
            .map_err(|_| ChainError::Rpc(format!("total supply {supply} does not fit in u64")))
    }

    async fn token_at(&self, index: u64) -> Result<String, ChainError> {
        Ok(self.inner.kryptoBirdz(U256::from(index)).call().await?)
    }

    async fn mint(&self, from: Address, token_uri: &str) -> Result<MintReceipt, ChainError> {
        let pending = self
            .inner
            .mint(token_uri.to_owned())
            .from(from)
            .send()
            .await?;
        let receipt = pending.get_receipt().await?;

        if !receipt.status() {
            return Err(ChainError::Reverted(format!(
                "mint transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        let transfer = receipt
            .inner
            .logs()
            .iter()
            .find_map(|log| log.log_decode::<IKryptoBird::Transfer>().ok())
            .map(|decoded| {
                let ev = decoded.inner.data;
                TokenTransfer {
                    from: ev.from,
                    to: ev.to,
                    token_id: ev.tokenId,
                }
            });

        Ok(MintReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            transfer,
        })
    }
}
