//! Contract-level scenarios: deployment metadata, minting, and indexing.

use alloy::primitives::{address, Address, U256};
use kryptobird::{
    artifact::ContractArtifact,
    chain::{BirdzContract, WalletProvider},
    error::ChainError,
};
use mock_chain::MockChain;

const DEPLOY: Address = address!("0x0b306bf915c4d645ff596e518faf3f9669b97016");
const USER: Address = address!("0x66ab6d9362d4f35596279692f0251db635165871");

fn chain() -> MockChain {
    MockChain::builder()
        .account(USER)
        .network_id(5777)
        .deploy(DEPLOY, "KryptoBird", "KBIRDZ")
        .build()
}

fn artifact() -> anyhow::Result<ContractArtifact> {
    ContractArtifact::from_json(&format!(
        r#"{{"contractName":"KryptoBird","networks":{{"5777":{{"address":"{DEPLOY}"}}}}}}"#
    ))
}

#[tokio::test]
async fn deploys_successfully() -> anyhow::Result<()> {
    let artifact = artifact()?;
    let address = artifact
        .deployment(5777)
        .expect("artifact records the development deployment");
    assert_ne!(address, Address::ZERO);

    let wallet = chain().detect()?;
    let contract = wallet.birdz_at(address);
    assert_eq!(contract.address(), DEPLOY);
    Ok(())
}

#[tokio::test]
async fn has_a_name() -> anyhow::Result<()> {
    let contract = chain().detect()?.birdz_at(DEPLOY);
    assert_eq!(contract.name().await?, "KryptoBird");
    Ok(())
}

#[tokio::test]
async fn has_a_symbol() -> anyhow::Result<()> {
    let contract = chain().detect()?.birdz_at(DEPLOY);
    assert_eq!(contract.symbol().await?, "KBIRDZ");
    Ok(())
}

#[tokio::test]
async fn minting_creates_a_new_token() -> anyhow::Result<()> {
    let contract = chain().detect()?.birdz_at(DEPLOY);

    let receipt = contract.mint(USER, "https...1").await?;
    assert_eq!(contract.total_supply().await?, 1);

    // An ERC-721 mint transfers from the zero address to the minter.
    let transfer = receipt.transfer.expect("mint receipt carries a transfer");
    assert_eq!(transfer.from, Address::ZERO);
    assert_eq!(transfer.to, USER);
    assert_eq!(transfer.token_id, U256::from(1));

    // The same URI cannot be minted twice.
    let duplicate = contract.mint(USER, "https...1").await;
    assert!(matches!(duplicate, Err(ChainError::Reverted(_))));
    assert_eq!(contract.total_supply().await?, 1);
    Ok(())
}

#[tokio::test]
async fn lists_kryptobirdz_in_index_order() -> anyhow::Result<()> {
    let contract = chain().detect()?.birdz_at(DEPLOY);
    for uri in ["https...1", "https...2", "https...3", "https...4"] {
        contract.mint(USER, uri).await?;
    }

    let supply = contract.total_supply().await?;
    let mut listed = Vec::new();
    for index in 1..=supply {
        listed.push(contract.token_at(index - 1).await?);
    }

    assert_eq!(listed, ["https...1", "https...2", "https...3", "https...4"]);
    Ok(())
}
