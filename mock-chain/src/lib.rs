//! In-memory mock chain
//! Scriptable stand-in for the wallet provider and KryptoBird contract
//!
//! Accounts, deployments, pre-minted tokens, and failures are all declared
//! up front through [`MockChain::builder`]; the built chain then implements
//! the client's collaborator traits. Every chain read is counted so tests
//! can assert that a blocked workflow issued none.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use kryptobird::{
    chain::{BirdzContract, MintReceipt, TokenTransfer, WalletProvider},
    error::{ChainError, SessionError},
};
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Endpoint label reported by a mock chain that refuses detection.
pub const MOCK_ENDPOINT: &str = "mock://chain";

// ============================================================================
// CHAIN STATE
// ============================================================================

#[derive(Debug)]
struct ContractState {
    name: String,
    symbol: String,
    tokens: Vec<String>,
}

#[derive(Debug)]
struct ChainState {
    accounts: Vec<Address>,
    network_id: u64,
    contracts: HashMap<Address, ContractState>,
    offline: bool,
    reads: u64,
    fail_token_read_at: Option<u64>,
    fail_total_supply: bool,
    block_height: u64,
    rng: StdRng,
}

/// Shared, scriptable chain state.
///
/// Cloning is cheap; clones observe the same state, so a test can keep one
/// handle for assertions while the client drives another.
#[derive(Clone, Debug)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn builder() -> MockChainBuilder {
        MockChainBuilder::default()
    }

    /// Mirrors provider acquisition: an offline chain yields
    /// [`SessionError::ProviderNotFound`], a reachable one a wallet handle.
    pub fn detect(&self) -> Result<MockWallet, SessionError> {
        if self.lock().offline {
            return Err(SessionError::ProviderNotFound {
                endpoint: MOCK_ENDPOINT.to_string(),
                source: ChainError::Rpc("connection refused".to_string()),
            });
        }
        Ok(MockWallet {
            chain: self.clone(),
        })
    }

    /// Number of chain reads issued so far (account, network, and contract
    /// view calls; mints are not reads).
    pub fn read_calls(&self) -> u64 {
        self.lock().reads
    }

    /// Removes any scripted read failure, letting later reads succeed.
    pub fn clear_read_failure(&self) {
        let mut state = self.lock();
        state.fail_token_read_at = None;
        state.fail_total_supply = false;
    }

    fn lock(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().expect("mock chain state poisoned")
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Declarative setup for a [`MockChain`].
#[derive(Default)]
pub struct MockChainBuilder {
    accounts: Vec<Address>,
    network_id: u64,
    contracts: Vec<(Address, ContractState)>,
    offline: bool,
    fail_token_read_at: Option<u64>,
    fail_total_supply: bool,
}

impl MockChainBuilder {
    /// Adds an unlocked wallet account. The first one added is the active
    /// account the client resolves.
    pub fn account(mut self, address: Address) -> Self {
        self.accounts.push(address);
        self
    }

    /// Network id the provider reports (`net_version`).
    pub fn network_id(mut self, network_id: u64) -> Self {
        self.network_id = network_id;
        self
    }

    /// Deploys a KryptoBird contract at `address` with no tokens minted.
    pub fn deploy(mut self, address: Address, name: &str, symbol: &str) -> Self {
        self.contracts.push((
            address,
            ContractState {
                name: name.to_string(),
                symbol: symbol.to_string(),
                tokens: Vec::new(),
            },
        ));
        self
    }

    /// Seeds token URIs already minted on the most recently deployed
    /// contract. Requires a prior [`MockChainBuilder::deploy`].
    pub fn tokens<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let contract = self
            .contracts
            .last_mut()
            .expect("tokens() requires a prior deploy()");
        contract.1.tokens.extend(uris.into_iter().map(Into::into));
        self
    }

    /// Makes detection fail, as if no provider were running.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Scripts the token read at storage `index` to fail until
    /// [`MockChain::clear_read_failure`] is called.
    pub fn fail_token_read_at(mut self, index: u64) -> Self {
        self.fail_token_read_at = Some(index);
        self
    }

    /// Scripts the total supply read to fail until
    /// [`MockChain::clear_read_failure`] is called.
    pub fn fail_total_supply(mut self) -> Self {
        self.fail_total_supply = true;
        self
    }

    pub fn build(self) -> MockChain {
        MockChain {
            state: Arc::new(Mutex::new(ChainState {
                accounts: self.accounts,
                network_id: self.network_id,
                contracts: self.contracts.into_iter().collect(),
                offline: self.offline,
                reads: 0,
                fail_token_read_at: self.fail_token_read_at,
                fail_total_supply: self.fail_total_supply,
                block_height: 1,
                rng: StdRng::seed_from_u64(42),
            })),
        }
    }
}

// ============================================================================
// COLLABORATOR IMPLEMENTATIONS
// ============================================================================

/// Wallet provider view of a [`MockChain`].
#[derive(Debug)]
pub struct MockWallet {
    chain: MockChain,
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let mut state = self.chain.lock();
        state.reads += 1;
        Ok(state.accounts.clone())
    }

    async fn network_id(&self) -> Result<u64, ChainError> {
        let mut state = self.chain.lock();
        state.reads += 1;
        Ok(state.network_id)
    }

    fn birdz_at(&self, address: Address) -> Arc<dyn BirdzContract> {
        Arc::new(MockBirdz {
            chain: self.chain.clone(),
            address,
        })
    }
}

/// Contract handle bound to one deployment on a [`MockChain`].
pub struct MockBirdz {
    chain: MockChain,
    address: Address,
}

impl MockBirdz {
    fn read_contract<T>(
        &self,
        read: impl FnOnce(&ContractState) -> Result<T, ChainError>,
    ) -> Result<T, ChainError> {
        let mut state = self.chain.lock();
        state.reads += 1;
        match state.contracts.get(&self.address) {
            Some(contract) => read(contract),
            None => Err(ChainError::Rpc(format!(
                "no contract code at {}",
                self.address
            ))),
        }
    }
}

#[async_trait]
impl BirdzContract for MockBirdz {
    fn address(&self) -> Address {
        self.address
    }

    async fn name(&self) -> Result<String, ChainError> {
        self.read_contract(|contract| Ok(contract.name.clone()))
    }

    async fn symbol(&self) -> Result<String, ChainError> {
        self.read_contract(|contract| Ok(contract.symbol.clone()))
    }

    async fn total_supply(&self) -> Result<u64, ChainError> {
        let failing = self.chain.lock().fail_total_supply;
        if failing {
            self.chain.lock().reads += 1;
            return Err(ChainError::Rpc("scripted totalSupply failure".to_string()));
        }
        self.read_contract(|contract| Ok(contract.tokens.len() as u64))
    }

    async fn token_at(&self, index: u64) -> Result<String, ChainError> {
        let failing = self.chain.lock().fail_token_read_at;
        if failing == Some(index) {
            self.chain.lock().reads += 1;
            return Err(ChainError::Rpc(format!(
                "scripted read failure at index {index}"
            )));
        }
        self.read_contract(|contract| {
            contract
                .tokens
                .get(index as usize)
                .cloned()
                .ok_or_else(|| {
                    ChainError::Reverted(format!("kryptoBirdz: no token at index {index}"))
                })
        })
    }

    async fn mint(&self, from: Address, token_uri: &str) -> Result<MintReceipt, ChainError> {
        let mut state = self.chain.lock();
        if !state.accounts.contains(&from) {
            return Err(ChainError::Rpc(format!("sender account not recognized: {from}")));
        }

        let contract = state
            .contracts
            .get_mut(&self.address)
            .ok_or_else(|| ChainError::Rpc(format!("no contract code at {}", self.address)))?;
        if contract.tokens.iter().any(|uri| uri == token_uri) {
            return Err(ChainError::Reverted("token URI already minted".to_string()));
        }
        contract.tokens.push(token_uri.to_string());
        let token_id = U256::from(contract.tokens.len() as u64);

        let mut tx_hash = [0u8; 32];
        state.rng.fill_bytes(&mut tx_hash);
        let block_number = state.block_height;
        state.block_height += 1;

        Ok(MintReceipt {
            tx_hash: B256::from(tx_hash),
            block_number: Some(block_number),
            transfer: Some(TokenTransfer {
                from: Address::ZERO,
                to: from,
                token_id,
            }),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
