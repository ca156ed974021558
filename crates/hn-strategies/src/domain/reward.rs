//! Reward strategy (§4.12): credits the block producer for assembling a block.

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;

use hn_persistence::{PersistenceError, PersistenceFacade};
use hn_registry::IndexStrategy;
use hn_types::payload::RewardPayload;
use hn_types::{AddressBalance, BlockIndex, CoreError, PayloadKind, TransactionPayload, ValidatedTransaction};

fn persistence_err(e: PersistenceError) -> CoreError {
    CoreError::PersistenceUnavailable(e.to_string())
}

/// Credits `issuer`'s balance by `amount` of `token`.
///
/// A reward mutates a balance by delta, not by overwrite, so it isn't
/// naturally idempotent on replay: the transaction's own id is recorded
/// as an applied marker in the same commit that touches the balance.
pub struct RewardStrategy {
    persistence: PersistenceFacade,
}

impl RewardStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl IndexStrategy for RewardStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::REWARD
    }

    async fn handle(&self, tx: &ValidatedTransaction, _block_index: BlockIndex) -> Result<(), CoreError> {
        let RewardPayload { issuer, token, amount } = match tx.payload() {
            TransactionPayload::Reward(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a reward payload".into())),
        };

        let marker = format!("reward:{}", tx.transaction_id());
        let uow = self.persistence.create_writable();
        if uow.bank().is_applied(&marker).map_err(persistence_err)? {
            uow.rollback().await;
            return Ok(());
        }

        let delta = Decimal::from_str(amount)
            .map_err(|e| CoreError::IndexingFailed(format!("bad reward amount {amount:?}: {e}")))?;

        let mut balance = uow
            .bank()
            .get_balance(issuer, token)
            .map_err(persistence_err)?
            .unwrap_or_else(|| AddressBalance::zero(issuer.clone(), token.clone()));
        balance.balance += delta;

        uow.bank().upsert_balance(&balance).map_err(persistence_err)?;
        uow.bank().mark_applied(&marker).map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)
    }
}
