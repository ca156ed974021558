//! Identity strategies (§4.12): profile creation and alias updates.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use hn_bus::{EventPublisher, NodeEvent};
use hn_persistence::{PersistenceError, PersistenceFacade};
use hn_registry::IndexStrategy;
use hn_types::payload::{FullIdentityPayload, UpdateIdentityPayload};
use hn_types::{BlockIndex, CoreError, IdentityProfile, PayloadKind, TransactionPayload, ValidatedTransaction};

fn persistence_err(e: PersistenceError) -> CoreError {
    CoreError::PersistenceUnavailable(e.to_string())
}

/// First-time identity registration. Inserts a Profile row if absent;
/// a replay against an already-present address is a no-op.
pub struct FullIdentityStrategy {
    persistence: PersistenceFacade,
}

impl FullIdentityStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl IndexStrategy for FullIdentityStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::FULL_IDENTITY
    }

    async fn handle(&self, tx: &ValidatedTransaction, block_index: BlockIndex) -> Result<(), CoreError> {
        let payload = match tx.payload() {
            TransactionPayload::FullIdentity(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a full-identity payload".into())),
        };

        let uow = self.persistence.create_writable();
        if uow
            .identity()
            .get_profile(&payload.public_signing_address)
            .map_err(persistence_err)?
            .is_some()
        {
            uow.rollback().await;
            return Ok(());
        }

        let FullIdentityPayload {
            public_signing_address,
            alias,
            short_alias,
            public_encrypt_address,
            is_public,
        } = payload.clone();

        uow.identity()
            .upsert_profile(&IdentityProfile {
                public_signing_address,
                alias,
                short_alias,
                public_encrypt_address,
                is_public,
                block_index,
            })
            .map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)
    }
}

/// Alias mutation of an existing identity. No-op if the profile doesn't
/// exist yet, or the new alias is blank.
pub struct UpdateIdentityStrategy {
    persistence: PersistenceFacade,
    bus: Arc<dyn EventPublisher>,
}

impl UpdateIdentityStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade, bus: Arc<dyn EventPublisher>) -> Self {
        Self { persistence, bus }
    }
}

#[async_trait]
impl IndexStrategy for UpdateIdentityStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::UPDATE_IDENTITY
    }

    async fn handle(&self, tx: &ValidatedTransaction, block_index: BlockIndex) -> Result<(), CoreError> {
        let UpdateIdentityPayload { public_signing_address, alias } = match tx.payload() {
            TransactionPayload::UpdateIdentity(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected an update-identity payload".into())),
        };

        if alias.trim().is_empty() {
            return Ok(());
        }

        let uow = self.persistence.create_writable();
        let mut profile = match uow.identity().get_profile(public_signing_address).map_err(persistence_err)? {
            Some(profile) => profile,
            None => {
                uow.rollback().await;
                return Ok(());
            }
        };

        profile.alias = alias.clone();
        profile.block_index = block_index;
        uow.identity().upsert_profile(&profile).map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)?;

        self.bus
            .publish(NodeEvent::IdentityUpdated {
                public_signing_address: public_signing_address.clone(),
            })
            .await;
        info!(%public_signing_address, "identity alias updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_bus::InMemoryEventBus;
    use hn_types::{SignatureInfo, SignedTransaction, UnsignedTransaction};

    fn full_identity_tx(address: &str) -> ValidatedTransaction {
        let payload = TransactionPayload::FullIdentity(FullIdentityPayload {
            public_signing_address: address.into(),
            alias: "alice".into(),
            short_alias: "al".into(),
            public_encrypt_address: "alice-enc".into(),
            is_public: true,
        });
        wrap(payload, address)
    }

    fn update_identity_tx(address: &str, alias: &str) -> ValidatedTransaction {
        let payload = TransactionPayload::UpdateIdentity(UpdateIdentityPayload {
            public_signing_address: address.into(),
            alias: alias.into(),
        });
        wrap(payload, address)
    }

    fn wrap(payload: TransactionPayload, address: &str) -> ValidatedTransaction {
        let unsigned = UnsignedTransaction::new(payload).unwrap();
        let signed = SignedTransaction {
            unsigned,
            user_signature: SignatureInfo {
                signatory_public_address: address.into(),
                signature: vec![],
            },
        };
        ValidatedTransaction {
            signed,
            validator_signature: SignatureInfo {
                signatory_public_address: "validator".into(),
                signature: vec![],
            },
        }
    }

    #[tokio::test]
    async fn full_identity_inserts_a_profile() {
        let persistence = PersistenceFacade::new();
        let strategy = FullIdentityStrategy::new(persistence.clone());

        strategy.handle(&full_identity_tx("alice"), BlockIndex::GENESIS).await.unwrap();

        let uow = persistence.create_read_only();
        assert!(uow.identity().get_profile(&"alice".into()).unwrap().is_some());
    }

    #[tokio::test]
    async fn full_identity_replay_is_a_no_op() {
        let persistence = PersistenceFacade::new();
        let strategy = FullIdentityStrategy::new(persistence.clone());
        let tx = full_identity_tx("alice");

        strategy.handle(&tx, BlockIndex::GENESIS).await.unwrap();
        strategy.handle(&tx, BlockIndex::GENESIS).await.unwrap();

        let uow = persistence.create_read_only();
        let profile = uow.identity().get_profile(&"alice".into()).unwrap().unwrap();
        assert_eq!(profile.alias, "alice");
    }

    #[tokio::test]
    async fn update_identity_changes_the_alias_and_publishes() {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(hn_bus::EventFilter::topics(vec![hn_bus::EventTopic::Identity]));

        FullIdentityStrategy::new(persistence.clone())
            .handle(&full_identity_tx("alice"), BlockIndex::GENESIS)
            .await
            .unwrap();

        let strategy = UpdateIdentityStrategy::new(persistence.clone(), Arc::clone(&bus) as Arc<dyn EventPublisher>);
        strategy
            .handle(&update_identity_tx("alice", "new-alias"), BlockIndex::GENESIS.next())
            .await
            .unwrap();

        let uow = persistence.create_read_only();
        let profile = uow.identity().get_profile(&"alice".into()).unwrap().unwrap();
        assert_eq!(profile.alias, "new-alias");

        let event = sub.recv().await.unwrap();
        assert!(matches!(event, NodeEvent::IdentityUpdated { .. }));
    }

    #[tokio::test]
    async fn update_identity_on_unknown_address_is_a_no_op() {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let strategy = UpdateIdentityStrategy::new(persistence.clone(), bus as Arc<dyn EventPublisher>);

        strategy
            .handle(&update_identity_tx("ghost", "alias"), BlockIndex::GENESIS)
            .await
            .unwrap();

        let uow = persistence.create_read_only();
        assert!(uow.identity().get_profile(&"ghost".into()).unwrap().is_none());
    }

    #[tokio::test]
    async fn update_identity_with_blank_alias_is_a_no_op() {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());

        FullIdentityStrategy::new(persistence.clone())
            .handle(&full_identity_tx("alice"), BlockIndex::GENESIS)
            .await
            .unwrap();

        let strategy = UpdateIdentityStrategy::new(persistence.clone(), bus as Arc<dyn EventPublisher>);
        strategy
            .handle(&update_identity_tx("alice", "   "), BlockIndex::GENESIS.next())
            .await
            .unwrap();

        let uow = persistence.create_read_only();
        let profile = uow.identity().get_profile(&"alice".into()).unwrap().unwrap();
        assert_eq!(profile.alias, "alice");
    }
}
