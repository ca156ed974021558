//! Identity domain: public profiles.

use crate::address::PublicAddress;
use crate::ids::BlockIndex;
use serde::{Deserialize, Serialize};

/// A public identity profile, keyed by its signing address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub public_signing_address: PublicAddress,
    pub alias: String,
    pub short_alias: String,
    pub public_encrypt_address: PublicAddress,
    pub is_public: bool,
    pub block_index: BlockIndex,
}
