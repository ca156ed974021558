//! Bank domain: address balances.

use crate::address::{PublicAddress, Token};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An address's balance of a single token.
///
/// Keyed by `(public_address, token)`. `Balance` is fixed-precision and
/// serializes to/from its decimal string form, never a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBalance {
    pub public_address: PublicAddress,
    pub token: Token,
    pub balance: Decimal,
}

impl AddressBalance {
    #[must_use]
    pub fn zero(public_address: PublicAddress, token: Token) -> Self {
        Self {
            public_address,
            token,
            balance: Decimal::ZERO,
        }
    }
}
