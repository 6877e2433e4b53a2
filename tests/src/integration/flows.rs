//! # Integration Test Flows
//!
//! Wallet and explorer talking to a [`SimulatedNode`] over the frame
//! transport, with real text frames in both directions.
//!
//! ## Flows Tested:
//!
//! 1. **Transfer**: build, sign, send, receive the ledger notification, fetch
//!    the transaction back, read balances
//! 2. **Rejection**: a signature under the wrong domain is refused
//! 3. **Captured data**: a transaction recorded from a live node hashes to
//!    its declared hash after the round trip
//! 4. **Connection loss**: waiters fail instead of hanging

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use rm_protocol::{
        address_from_public_key, Amount, Currency, DeclarationType, ExplorerApi, ExplorerClient,
        FrameTransport, InMemoryKeyStore, ProtocolConfig, ProtocolError, TransportError,
        WalletApi, WalletService,
    };
    use shared_crypto::{Hash256, PrivateKey};
    use shared_types::{
        CridGenerator, EnvelopeError, GetMiningTaskRequest, ResponsePayload,
        Transaction as WireTransaction,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const NOW: i64 = 1_700_000_000;

    fn explorer(transport: FrameTransport) -> ExplorerClient<FrameTransport> {
        ExplorerClient::new(transport, CridGenerator::new(NOW, 0))
    }

    async fn reference_wallet() -> WalletService {
        let key = PrivateKey::from_base64(REFERENCE_KEY).unwrap();
        let store = InMemoryKeyStore::with_key(key.to_bytes());
        WalletService::open(&store, ProtocolConfig::default())
            .await
            .unwrap()
    }

    // =============================================================================
    // TRANSFER FLOW
    // =============================================================================

    #[tokio::test]
    async fn test_transfer_roundtrip() {
        let node = Arc::new(SimulatedNode::new());
        let mut connection = connect(Arc::clone(&node));
        let explorer = explorer(connection.transport);

        let wallet = reference_wallet().await;
        let receiver = address_from_public_key(&PrivateKey::generate().public_key());
        let transaction = wallet
            .build_transfer(
                &receiver,
                Currency::IRO,
                Amount::from_units(250_000_000).unwrap(),
                NOW,
            )
            .with_message(b"thanks".to_vec());
        let local_hash = transaction.hash().unwrap();

        // Send
        let request = wallet.build_send_request(&transaction).unwrap();
        let hash = explorer.send_transaction(request).await.unwrap();
        assert_eq!(hash, local_hash);

        // The node pushed the closed ledger before answering
        let pushed = timeout(Duration::from_secs(1), connection.notifications.recv())
            .await
            .expect("Timeout waiting for ledger notification")
            .expect("Notification channel closed");
        assert!(pushed.is_notification());
        match ResponsePayload::from_envelope(&pushed).unwrap() {
            ResponsePayload::GetLedger(response) => {
                assert_eq!(response.ledger.height, 1);
                assert_eq!(response.ledger.transactions[0].hash, hash.to_base64());
            }
            other => panic!("unexpected notification {other:?}"),
        }

        // Fetch it back
        let fetched = explorer.get_transaction(&hash).await.unwrap();
        assert_eq!(fetched, transaction);
        assert_eq!(fetched.message().unwrap().as_bytes(), b"thanks");

        // Balances moved
        let credited = explorer.get_account(&receiver).await.unwrap();
        assert_eq!(credited.balance["IRO"], 2.5);
        let debited = explorer.get_account(wallet.address()).await.unwrap();
        assert_eq!(debited.balance["IRO"], -2.5);

        let ledger = explorer.get_ledger(None).await.unwrap();
        assert_eq!(ledger.height, node.ledger_height());
    }

    #[tokio::test]
    async fn test_multiple_transfers_chain_ledgers() {
        let node = Arc::new(SimulatedNode::new());
        let connection = connect(Arc::clone(&node));
        let explorer = explorer(connection.transport);
        let wallet = reference_wallet().await;

        for units in [1, 2, 4] {
            let transaction = wallet.build_transfer(
                wallet.address(),
                Currency::WOD,
                Amount::from_units(units).unwrap(),
                NOW + units,
            );
            let request = wallet.build_send_request(&transaction).unwrap();
            explorer.send_transaction(request).await.unwrap();
        }

        let ledger = explorer.get_ledger(None).await.unwrap();
        assert_eq!(ledger.height, 3);
        assert_eq!(ledger.lastledger, "ledger-2");
    }

    // =============================================================================
    // REJECTION
    // =============================================================================

    #[tokio::test]
    async fn test_node_rejects_foreign_domain() {
        let node = Arc::new(SimulatedNode::with_network(b"testnet.republicofminer.com"));
        let connection = connect(node);
        let explorer = explorer(connection.transport);

        let wallet = reference_wallet().await;
        let transaction = wallet.build_transfer(
            wallet.address(),
            Currency::IRO,
            Amount::from_units(1).unwrap(),
            NOW,
        );
        let request = wallet.build_send_request(&transaction).unwrap();

        assert_eq!(
            explorer.send_transaction(request).await.unwrap_err(),
            ProtocolError::Envelope(EnvelopeError::RequestFailed {
                kind: "SendTransactionResponse".to_string(),
                result: RESULT_REJECTED,
            })
        );
    }

    #[tokio::test]
    async fn test_amount_lost_in_decimal_is_rejected() {
        let connection = connect(Arc::new(SimulatedNode::new()));
        let explorer = explorer(connection.transport);

        // 3 units travel as 3e-8, which truncates back to 2 units
        let wallet = reference_wallet().await;
        let transaction = wallet.build_transfer(
            wallet.address(),
            Currency::IRO,
            Amount::from_units(3).unwrap(),
            NOW,
        );
        let request = wallet.build_send_request(&transaction).unwrap();

        assert!(matches!(
            explorer.send_transaction(request).await,
            Err(ProtocolError::Envelope(EnvelopeError::RequestFailed { result: RESULT_REJECTED, .. }))
        ));
    }

    #[tokio::test]
    async fn test_unsigned_transaction_rejected() {
        let connection = connect(Arc::new(SimulatedNode::new()));
        let explorer = explorer(connection.transport);

        let wallet = reference_wallet().await;
        let transaction = wallet.build_transfer(
            wallet.address(),
            Currency::IRO,
            Amount::from_units(1).unwrap(),
            NOW,
        );
        let mut request = wallet.build_send_request(&transaction).unwrap();
        request.signatures.clear();

        assert!(matches!(
            explorer.send_transaction(request).await,
            Err(ProtocolError::Envelope(EnvelopeError::RequestFailed { result: RESULT_REJECTED, .. }))
        ));
    }

    // =============================================================================
    // CAPTURED DATA
    // =============================================================================

    #[tokio::test]
    async fn test_fetch_captured_transaction() {
        let node = Arc::new(SimulatedNode::new());
        let captured: WireTransaction = serde_json::from_str(CAPTURED_TRANSACTION).unwrap();
        node.preload(captured.clone());

        let connection = connect(node);
        let explorer = explorer(connection.transport);
        let hash = Hash256::from_base64(&captured.hash).unwrap();

        let transaction = explorer.get_transaction(&hash).await.unwrap();
        assert_eq!(transaction.hash().unwrap(), hash);
        assert_eq!(transaction.expire(), 1556277083);
        assert_eq!(transaction.declarations()[0].kind(), DeclarationType::Secret);
        assert!(transaction.message().is_none());
        assert_eq!(transaction.inputs()[0].amount().units(), 1);
    }

    #[tokio::test]
    async fn test_unknown_transaction() {
        let connection = connect(Arc::new(SimulatedNode::new()));
        let explorer = explorer(connection.transport);

        assert!(matches!(
            explorer.get_transaction(&Hash256::new([7u8; 32])).await,
            Err(ProtocolError::Envelope(EnvelopeError::RequestFailed { result: RESULT_NOT_FOUND, .. }))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_request() {
        let connection = connect(Arc::new(SimulatedNode::new()));
        let explorer = explorer(connection.transport);

        let result = explorer
            .request(GetMiningTaskRequest {
                address: "qyl68tygnjx6qqwrsmynmejmc9wxlw7almv3397j".to_string(),
                resource: "IRO".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(ProtocolError::Envelope(EnvelopeError::RequestFailed { result: RESULT_UNSUPPORTED, .. }))
        ));
    }

    // =============================================================================
    // CORRELATION
    // =============================================================================

    #[tokio::test]
    async fn test_concurrent_requests_are_correlated() {
        let connection = connect(Arc::new(SimulatedNode::new()));
        let explorer = explorer(connection.transport);
        let wallet = reference_wallet().await;

        let (ledger, account, again) = tokio::join!(
            explorer.get_ledger(None),
            explorer.get_account(wallet.address()),
            explorer.get_ledger(Some(0)),
        );

        assert_eq!(ledger.unwrap().height, 0);
        assert_eq!(account.unwrap().address, wallet.address().to_string());
        assert_eq!(again.unwrap().height, 0);
    }

    #[tokio::test]
    async fn test_connection_loss_fails_waiters() {
        let connection = connect(Arc::new(SimulatedNode::hanging_up_on("GetLedgerRequest")));
        let task = connection.task;
        let explorer = explorer(connection.transport);

        let closed = ProtocolError::Transport(TransportError::ConnectionClosed.to_string());
        let result = timeout(Duration::from_secs(1), explorer.get_ledger(None))
            .await
            .expect("Waiter hung after the connection closed");
        assert_eq!(result.unwrap_err(), closed);

        task.await.unwrap();
        let wallet = reference_wallet().await;
        assert_eq!(
            explorer.get_account(wallet.address()).await.unwrap_err(),
            closed
        );
    }
}
