//! KryptoBird dApp client
//! Wallet provider detection, contract session loading, and minting

pub mod artifact;
pub mod chain;
pub mod error;
pub mod provider;
pub mod session;
