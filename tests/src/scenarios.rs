//! Black-box end-to-end scenarios (the six seeded in §8), driven
//! entirely through a fully-wired [`node_runtime::Node`] — submission
//! goes through the real RPC handlers, indexing through the real
//! dispatcher, nothing here reaches into a crate's internals.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hn_crypto::Ed25519KeyPair;
    use hn_types::payload::{NewPersonalFeedPayload, NewReactionPayload, RewardPayload, SendFundsPayload};
    use hn_types::{
        AddressBalance, BlockIndex, PublicAddress, SignatureInfo, SignedTransaction,
        TransactionPayload, UnsignedTransaction, ValidatedTransaction,
    };
    use hn_validators::crypto_helpers::encode_address;
    use node_runtime::config::{
        BlockchainSettings, ConnectionStrings, MempoolSettings, ReactionsSettings, RedisSettings, StackerInfo,
    };
    use node_runtime::{Node, NodeConfig};

    fn test_config() -> NodeConfig {
        NodeConfig {
            connection_strings: ConnectionStrings::default(),
            blockchain: BlockchainSettings::default(),
            mempool: MempoolSettings::default(),
            reactions: ReactionsSettings::default(),
            stacker_info: StackerInfo {
                public_signing_address: String::new(),
                private_signing_key: String::new(),
                public_encrypt_address: String::new(),
                private_encrypt_key: String::new(),
            },
            redis: RedisSettings::default(),
        }
    }

    fn build_node() -> Node {
        Node::build(&test_config(), Ed25519KeyPair::generate()).unwrap()
    }

    fn sign(keypair: &Ed25519KeyPair, unsigned: UnsignedTransaction) -> Vec<u8> {
        let json = unsigned.canonical_json().unwrap();
        let signature = keypair.sign(json.as_bytes());
        let signed = SignedTransaction {
            unsigned,
            user_signature: SignatureInfo {
                signatory_public_address: encode_address(&keypair.public_key()),
                signature: signature.as_bytes().to_vec(),
            },
        };
        serde_json::to_vec(&signed).unwrap()
    }

    /// A mempool-ready reward transaction, bypassing the ingress/validator
    /// path: used only to fill the mempool to a known size directly.
    fn validated_reward(issuer: &PublicAddress) -> ValidatedTransaction {
        let payload = TransactionPayload::Reward(RewardPayload {
            issuer: issuer.clone(),
            token: "HUSH".into(),
            amount: "1".to_string(),
        });
        let unsigned = UnsignedTransaction::new(payload).unwrap();
        let signed = SignedTransaction {
            unsigned,
            user_signature: SignatureInfo {
                signatory_public_address: issuer.clone(),
                signature: vec![],
            },
        };
        ValidatedTransaction {
            signed,
            validator_signature: SignatureInfo {
                signatory_public_address: issuer.clone(),
                signature: vec![],
            },
        }
    }

    // 1. Cold start genesis.
    #[tokio::test]
    async fn cold_start_genesis_produces_exactly_one_genesis_block() {
        let node = build_node();
        let mut sub = node.bus.subscribe(hn_bus::EventFilter::all());

        node.foundation.initialize().await.unwrap();

        let uow = node.persistence.create_read_only();
        let state = uow.blockchain().get_blockchain_state().unwrap().unwrap();
        assert_eq!(state.block_index, BlockIndex::GENESIS);
        assert_eq!(state.previous_block_id, hn_types::BlockId::EMPTY);
        let block = uow.blockchain().get_block(state.current_block_id).unwrap();
        assert!(block.is_some(), "the genesis block row itself must be persisted");

        let event = sub.recv().await.unwrap();
        assert!(matches!(event, hn_bus::NodeEvent::BlockchainInitialized));
    }

    // 2. Personal feed creation, then strategy idempotence on resubmission.
    #[tokio::test]
    async fn personal_feed_creation_is_idempotent_on_resubmission() {
        let node = build_node();
        node.foundation.initialize().await.unwrap();

        let user = Ed25519KeyPair::generate();
        let owner = encode_address(&user.public_key());
        let feed_id = hn_types::FeedId::new();
        let payload = NewPersonalFeedPayload {
            feed_id,
            owner: owner.clone(),
            encrypted_feed_key: "key-material".to_string(),
        };
        let unsigned = UnsignedTransaction::new(TransactionPayload::NewPersonalFeed(payload)).unwrap();
        let bytes = sign(&user, unsigned);

        let first = node.blockchain_handler.submit_signed_transaction(&bytes).await;
        assert_eq!(first.status, hn_types::RpcStatus::Accepted);

        let block = node.scheduler.tick().await.expect("a block should be assembled");
        node.indexer.index_block(&block).await;

        let uow = node.persistence.create_read_only();
        let feed = uow.feeds().get_feed(feed_id).unwrap().unwrap();
        assert_eq!(feed.participants, vec![owner.clone()]);

        // Resubmit the identical signed envelope and index it again.
        let second = node.blockchain_handler.submit_signed_transaction(&bytes).await;
        assert_eq!(second.status, hn_types::RpcStatus::Accepted);
        let block = node.scheduler.tick().await.expect("a second block should be assembled");
        node.indexer.index_block(&block).await;

        let uow = node.persistence.create_read_only();
        let feed = uow.feeds().get_feed(feed_id).unwrap().unwrap();
        assert_eq!(feed.participants, vec![owner], "re-indexing must not duplicate the participant row");
    }

    // 3. Duplicate message race: only one submission is accepted, the
    // other observes Pending, and a post-commit check reports AlreadyExists.
    #[tokio::test]
    async fn duplicate_message_submissions_resolve_to_one_winner() {
        let node = build_node();
        node.foundation.initialize().await.unwrap();

        let user = Ed25519KeyPair::generate();
        let feed_id = hn_types::FeedId::new();
        let message_id = hn_types::FeedMessageId::new();
        let payload = hn_types::payload::NewFeedMessagePayload {
            feed_message_id: message_id,
            feed_id,
            issuer: encode_address(&user.public_key()),
            content: "hello".to_string(),
        };
        let unsigned = UnsignedTransaction::new(TransactionPayload::NewFeedMessage(payload)).unwrap();
        let bytes = sign(&user, unsigned);

        let first = node.feeds_handler.submit(&bytes).await;
        let second = node.feeds_handler.submit(&bytes).await;

        let statuses = [first.status, second.status];
        assert!(statuses.contains(&hn_types::RpcStatus::Accepted));
        assert!(statuses.contains(&hn_types::RpcStatus::Pending));

        let block = node.scheduler.tick().await.expect("a block should be assembled");
        node.indexer.index_block(&block).await;

        let third = node.feeds_handler.submit(&bytes).await;
        assert_eq!(third.status, hn_types::RpcStatus::AlreadyExists);
    }

    // 4. Reaction: first vote, then an update against the same nullifier.
    #[tokio::test]
    async fn a_second_reaction_with_the_same_nullifier_updates_the_tally_in_place() {
        let node = build_node();
        node.foundation.initialize().await.unwrap();

        let user = Ed25519KeyPair::generate();
        let message_id = hn_types::FeedMessageId::new();
        let feed_id = hn_types::FeedId::new();
        let nullifier = [7u8; 32];

        let reaction = |vote_byte: u8| {
            let slots = |b: u8| vec![[b; 32]; hn_types::payload::REACTION_SLOT_COUNT];
            NewReactionPayload {
                message_id,
                feed_id,
                nullifier,
                vote_c1x: slots(vote_byte),
                vote_c1y: slots(vote_byte),
                vote_c2x: slots(vote_byte),
                vote_c2y: slots(vote_byte),
                encrypted_backup: None,
                circuit_version: "dev-mode-v1".to_string(),
                proof: vec![],
            }
        };

        let first_unsigned = UnsignedTransaction::new(TransactionPayload::NewReaction(reaction(1))).unwrap();
        let first_bytes = sign(&user, first_unsigned);
        let first = node.blockchain_handler.submit_signed_transaction(&first_bytes).await;
        assert_eq!(first.status, hn_types::RpcStatus::Accepted);

        let block = node.scheduler.tick().await.expect("a block should be assembled");
        node.indexer.index_block(&block).await;

        {
            let uow = node.persistence.create_read_only();
            let tally = uow.reactions().get_tally(message_id).unwrap().unwrap();
            assert_eq!(tally.total_count, 1);
            assert_eq!(tally.version, 1);
        }

        let second_unsigned = UnsignedTransaction::new(TransactionPayload::NewReaction(reaction(2))).unwrap();
        let second_bytes = sign(&user, second_unsigned);
        let second = node.blockchain_handler.submit_signed_transaction(&second_bytes).await;
        assert_eq!(second.status, hn_types::RpcStatus::Accepted);

        let block = node.scheduler.tick().await.expect("a second block should be assembled");
        node.indexer.index_block(&block).await;

        let uow = node.persistence.create_read_only();
        let tally = uow.reactions().get_tally(message_id).unwrap().unwrap();
        assert_eq!(tally.total_count, 1, "an update against the same nullifier is not a second vote");
        assert_eq!(tally.version, 2);

        let record = uow.reactions().get_nullifier(nullifier).unwrap().unwrap();
        assert_eq!(record.vote_c1x, vec![[2u8; 32]; hn_types::payload::REACTION_SLOT_COUNT]);
    }

    // 5. Transfer funds atomically.
    #[tokio::test]
    async fn send_funds_moves_balance_atomically() {
        let node = build_node();
        node.foundation.initialize().await.unwrap();

        let sender = PublicAddress("alice".to_string());
        let receiver = PublicAddress("bob".to_string());
        let token = hn_types::Token("HUSH".to_string());

        {
            let uow = node.persistence.create_writable();
            let mut balance = AddressBalance::zero(sender.clone(), token.clone());
            balance.balance = rust_decimal::Decimal::new(1000, 2); // 10.00
            uow.bank().upsert_balance(&balance).unwrap();
            uow.commit().await.unwrap();
        }

        let producer = Ed25519KeyPair::generate();
        let payload = SendFundsPayload {
            from: sender.clone(),
            to: receiver.clone(),
            token: token.clone(),
            amount: "3".to_string(),
        };
        let unsigned = UnsignedTransaction::new(TransactionPayload::SendFunds(payload)).unwrap();
        let bytes = sign(&producer, unsigned);

        let response = node.blockchain_handler.submit_signed_transaction(&bytes).await;
        assert_eq!(response.status, hn_types::RpcStatus::Accepted);

        let block = node.scheduler.tick().await.expect("a block should be assembled");
        node.indexer.index_block(&block).await;

        let uow = node.persistence.create_read_only();
        let sender_balance = uow.bank().get_balance(&sender, &token).unwrap().unwrap();
        let receiver_balance = uow.bank().get_balance(&receiver, &token).unwrap().unwrap();
        assert_eq!(sender_balance.balance, rust_decimal::Decimal::new(700, 2));
        assert_eq!(receiver_balance.balance, rust_decimal::Decimal::new(300, 2));
    }

    // 6. Mempool boundary: 1500 queued, one block drains at most the
    // configured batch plus the assembler's own reward transaction.
    #[tokio::test]
    async fn a_tick_drains_at_most_the_configured_batch() {
        let node = build_node();
        node.foundation.initialize().await.unwrap();

        let issuer = PublicAddress("load-generator".to_string());
        for _ in 0..1500 {
            node.mempool.add(validated_reward(&issuer));
        }
        assert_eq!(node.mempool.len(), 1500);

        let block = node.scheduler.tick().await.expect("a block should be assembled");
        assert_eq!(block.signed.unsigned.transactions.len(), 1001);
        assert_eq!(node.mempool.len(), 500);
    }
}
