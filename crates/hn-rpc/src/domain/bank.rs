//! `HushBank` (spec §6): balance lookups.

use hn_persistence::PersistenceFacade;
use hn_types::{AddressBalance, PublicAddress, Token};

pub struct BankHandler {
    persistence: PersistenceFacade,
}

impl BankHandler {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }

    /// `GetAddressBalance({address, token}) → {balance: decimal-string}`.
    ///
    /// An address with no recorded balance for `token` is zero, not an error.
    #[must_use]
    pub fn get_address_balance(&self, address: &PublicAddress, token: &Token) -> String {
        let uow = self.persistence.create_read_only();
        let balance = uow
            .bank()
            .get_balance(address, token)
            .ok()
            .flatten()
            .unwrap_or_else(|| AddressBalance::zero(address.clone(), token.clone()));
        balance.balance.to_string()
    }
}
