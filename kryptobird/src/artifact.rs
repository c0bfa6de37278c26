//! Truffle build artifact parsing and deployment lookup.
//!
//! The artifact is the JSON file the contract build step writes (one per
//! contract, under `abis/` here). The client only consumes the deployment
//! table; the contract interface itself is bound at compile time in
//! [`provider`](crate::provider).

use std::{collections::HashMap, fs, path::Path};

use alloy::primitives::{Address, B256};
use anyhow::{Context, Result};
use serde::Deserialize;

/// One row of the artifact's `networks` table.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    /// Address the contract was deployed at on this network.
    pub address: Address,
    /// Hash of the deployment transaction, when recorded.
    #[serde(default)]
    pub transaction_hash: Option<B256>,
}

/// The slice of a truffle build artifact this client consumes.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    /// Deployment records keyed by network id (stringly keyed in the JSON).
    #[serde(default)]
    pub networks: HashMap<String, NetworkDeployment>,
}

impl ContractArtifact {
    /// Parses an artifact from its JSON text.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a recorded address does
    /// not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse contract artifact JSON")
    }

    /// Reads and parses an artifact file.
    ///
    /// # Arguments
    /// * `path` - Path to the build artifact JSON
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| {
            format!("Failed to read contract artifact from {}", path.display())
        })?;
        Self::from_json(&raw)
    }

    /// Full deployment record for `network_id`, if the artifact has one.
    pub fn deployment_record(&self, network_id: u64) -> Option<&NetworkDeployment> {
        self.networks.get(&network_id.to_string())
    }

    /// Deployment address for `network_id`, if the artifact records one.
    pub fn deployment(&self, network_id: u64) -> Option<Address> {
        self.deployment_record(network_id)
            .map(|record| record.address)
    }
}
