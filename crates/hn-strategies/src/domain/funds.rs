//! Fund-transfer strategy (§4.12).

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;

use hn_persistence::{PersistenceError, PersistenceFacade};
use hn_registry::IndexStrategy;
use hn_types::payload::SendFundsPayload;
use hn_types::{AddressBalance, BlockIndex, CoreError, PayloadKind, TransactionPayload, ValidatedTransaction};

fn persistence_err(e: PersistenceError) -> CoreError {
    CoreError::PersistenceUnavailable(e.to_string())
}

/// Debits `from` and credits `to` by the same amount in one commit,
/// under the non-negativity invariant on the sender's balance.
///
/// Like the reward strategy, a transfer mutates two balances by delta,
/// so it records an applied marker before touching either row.
pub struct SendFundsStrategy {
    persistence: PersistenceFacade,
}

impl SendFundsStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl IndexStrategy for SendFundsStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::SEND_FUNDS
    }

    async fn handle(&self, tx: &ValidatedTransaction, _block_index: BlockIndex) -> Result<(), CoreError> {
        let SendFundsPayload { from, to, token, amount } = match tx.payload() {
            TransactionPayload::SendFunds(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a send-funds payload".into())),
        };

        let marker = format!("transfer:{}", tx.transaction_id());
        let uow = self.persistence.create_writable();
        if uow.bank().is_applied(&marker).map_err(persistence_err)? {
            uow.rollback().await;
            return Ok(());
        }

        let amount = Decimal::from_str(amount)
            .map_err(|e| CoreError::IndexingFailed(format!("bad transfer amount {amount:?}: {e}")))?;

        let mut sender = uow
            .bank()
            .get_balance(from, token)
            .map_err(persistence_err)?
            .unwrap_or_else(|| AddressBalance::zero(from.clone(), token.clone()));
        if sender.balance < amount {
            uow.rollback().await;
            return Err(CoreError::IndexingFailed(format!(
                "insufficient balance: {from} has {} {token}, needs {amount}",
                sender.balance
            )));
        }
        sender.balance -= amount;

        let mut receiver = uow
            .bank()
            .get_balance(to, token)
            .map_err(persistence_err)?
            .unwrap_or_else(|| AddressBalance::zero(to.clone(), token.clone()));
        receiver.balance += amount;

        uow.bank().upsert_balance(&sender).map_err(persistence_err)?;
        uow.bank().upsert_balance(&receiver).map_err(persistence_err)?;
        uow.bank().mark_applied(&marker).map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)
    }
}
