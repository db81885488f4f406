use std::time::Duration;

use nexus_desktop::defaults;
use nexus_desktop::nft::{MockNftSource, NftSource};
use nexus_desktop::tx::{
    ChainExecutor, MockChainExecutor, TransactionStatus, TxKind, TxLifecycle, TxPayload,
    run_transaction,
};
use nexus_desktop::validation::is_valid_eth_address;
use nexus_desktop::wallet::{MockWalletProvider, truncate_address, truncate_recipient};

// End-to-end mint: submit, execute against a zero-latency executor
// forced to succeed, resolve into success.
#[test]
fn test_mint_flow_end_to_end() {
    let executor = MockChainExecutor::new()
        .with_latency(Duration::ZERO)
        .with_success_rate(1.0);
    let mut lifecycle = TxLifecycle::new(TxKind::Mint);

    let result = run_transaction(
        &mut lifecycle,
        &executor,
        &TxPayload::Mint { quantity: 3 },
        true,
    );

    assert!(result.is_ok());
    assert_eq!(
        lifecycle.status().message(),
        Some("NFT minted successfully!")
    );

    let hash = lifecycle.status().hash().unwrap();
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 66); // 0x + 32 bytes of hex
}

#[test]
fn test_transfer_flow_forced_failure() {
    let executor = MockChainExecutor::new()
        .with_latency(Duration::ZERO)
        .with_success_rate(0.0);
    let mut lifecycle = TxLifecycle::new(TxKind::Transfer);

    let payload = TxPayload::Transfer {
        token_id: "4201".to_string(),
        recipient: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
    };
    let result = run_transaction(&mut lifecycle, &executor, &payload, true);

    assert!(result.is_ok());
    assert!(matches!(
        lifecycle.status(),
        TransactionStatus::Error { .. }
    ));
    assert_eq!(
        lifecycle.status().message(),
        Some("Transaction failed. Please try again.")
    );
}

#[test]
fn test_synthesized_hashes_are_unique() {
    let executor = MockChainExecutor::new()
        .with_latency(Duration::ZERO)
        .with_success_rate(1.0);
    let payload = TxPayload::Mint { quantity: 1 };

    let first = executor.execute(&payload).unwrap();
    let second = executor.execute(&payload).unwrap();
    assert_ne!(first.hash, second.hash);
}

// The mock provider must hand out addresses that pass the app's own
// validator, otherwise a freshly connected user could not transfer to
// themselves.
#[test]
fn test_wallet_connect_produces_valid_session() {
    let provider = MockWalletProvider::new().with_latency(Duration::ZERO);
    let session = provider.connect_blocking().unwrap();

    assert!(is_valid_eth_address(&session.address));
    assert_eq!(session.balance, defaults::MOCK_BALANCE_ETH);
}

#[test]
fn test_connected_wallet_sees_its_collection() {
    let provider = MockWalletProvider::new().with_latency(Duration::ZERO);
    let session = provider.connect_blocking().unwrap();

    let source = MockNftSource::new();
    let items = source.list_owned(&session.address);

    assert_eq!(items.len(), 6);
    for nft in &items {
        assert_eq!(nft.owner, session.address);
    }
}

#[tokio::test]
async fn test_wallet_connect_async() {
    let provider = MockWalletProvider::new().with_latency(Duration::ZERO);
    let session = provider.connect_async().await.unwrap();
    assert!(session.address.starts_with("0x"));
    assert_eq!(session.address.len(), 42);
}

#[tokio::test]
async fn test_executor_async_success() {
    let executor = MockChainExecutor::new()
        .with_latency(Duration::ZERO)
        .with_success_rate(1.0);

    let receipt = executor
        .execute_async(&TxPayload::Mint { quantity: 2 })
        .await
        .unwrap();
    assert!(receipt.hash.starts_with("0x"));
}

#[test]
fn test_address_truncation_formats() {
    let address = "0x1234567890abcdef1234567890abcdef12345678";

    assert_eq!(truncate_address(address), "0x1234...5678");
    assert_eq!(truncate_recipient(address), "0x12345678...12345678");

    // Short strings pass through untouched
    assert_eq!(truncate_address("0x1234"), "0x1234");
    assert_eq!(truncate_recipient("0x1234567890"), "0x1234567890");
}
