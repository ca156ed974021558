//! Node configuration, one nested struct per bounded context, each with
//! a sane [`Default`] and an `_from_env` override for the settings that
//! are genuinely environment-specific.

use std::env;

/// Where durable state lives.
#[derive(Debug, Clone)]
pub struct ConnectionStrings {
    pub hush_network_db: String,
}

impl Default for ConnectionStrings {
    fn default() -> Self {
        Self {
            hush_network_db: "hush-network.db".to_string(),
        }
    }
}

/// Block production cadence.
#[derive(Debug, Clone)]
pub struct BlockchainSettings {
    pub block_interval_ms: u64,
}

impl Default for BlockchainSettings {
    fn default() -> Self {
        Self { block_interval_ms: 5000 }
    }
}

/// Mempool draining limits.
#[derive(Debug, Clone)]
pub struct MempoolSettings {
    pub max_drain_batch: usize,
}

impl Default for MempoolSettings {
    fn default() -> Self {
        Self { max_drain_batch: 1000 }
    }
}

/// Anonymous-reaction acceptance tuning.
#[derive(Debug, Clone)]
pub struct ReactionsSettings {
    pub merkle_root_grace_period: usize,
}

impl Default for ReactionsSettings {
    fn default() -> Self {
        Self { merkle_root_grace_period: 3 }
    }
}

/// The block producer's own signing and encryption credentials.
///
/// `private_signing_key` is the 32-byte Ed25519 seed, hex-encoded; there
/// is no `Default` for the keys themselves, a freshly generated keypair
/// is never silently substituted for a missing one in `_from_env`.
#[derive(Clone)]
pub struct StackerInfo {
    pub public_signing_address: String,
    pub private_signing_key: String,
    pub public_encrypt_address: String,
    pub private_encrypt_key: String,
}

impl std::fmt::Debug for StackerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackerInfo")
            .field("public_signing_address", &self.public_signing_address)
            .field("private_signing_key", &"<redacted>")
            .field("public_encrypt_address", &self.public_encrypt_address)
            .field("private_encrypt_key", &"<redacted>")
            .finish()
    }
}

/// Optional Redis-backed cache in front of the persistence façade.
///
/// Nothing in this node currently reads from Redis — `hn-cache`'s
/// in-process `BlockchainCache` already covers the one hot read path —
/// so `enabled` stays `false` until a future cache layer needs it.
/// Carried here because it is part of the node's ambient operational
/// surface, not because anything is wired to it yet.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub connection_string: String,
    pub instance_name: String,
    pub enabled: bool,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            connection_string: "redis://127.0.0.1:6379".to_string(),
            instance_name: "hush-node".to_string(),
            enabled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub connection_strings: ConnectionStrings,
    pub blockchain: BlockchainSettings,
    pub mempool: MempoolSettings,
    pub reactions: ReactionsSettings,
    pub stacker_info: StackerInfo,
    pub redis: RedisSettings,
}

impl NodeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for everything except the stacker's own credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if `HN_PRIVATE_SIGNING_KEY` is unset or is not a
    /// 64-character hex string: there is no safe default block-producer
    /// identity to fall back to.
    pub fn from_env() -> anyhow::Result<Self> {
        let private_signing_key = env::var("HN_PRIVATE_SIGNING_KEY")
            .map_err(|_| anyhow::anyhow!("HN_PRIVATE_SIGNING_KEY is not set"))?;
        let seed = hex::decode(&private_signing_key)
            .map_err(|e| anyhow::anyhow!("HN_PRIVATE_SIGNING_KEY is not valid hex: {e}"))?;
        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| anyhow::anyhow!("HN_PRIVATE_SIGNING_KEY must decode to 32 bytes"))?;
        let keypair = hn_crypto::Ed25519KeyPair::from_seed(seed);
        let public_signing_address = hex::encode(keypair.public_key().as_bytes());

        Ok(Self {
            connection_strings: ConnectionStrings {
                hush_network_db: env::var("HN_NETWORK_DB")
                    .unwrap_or_else(|_| ConnectionStrings::default().hush_network_db),
            },
            blockchain: BlockchainSettings {
                block_interval_ms: env::var("HN_BLOCK_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| BlockchainSettings::default().block_interval_ms),
            },
            mempool: MempoolSettings {
                max_drain_batch: env::var("HN_MAX_DRAIN_BATCH")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| MempoolSettings::default().max_drain_batch),
            },
            reactions: ReactionsSettings {
                merkle_root_grace_period: env::var("HN_MERKLE_ROOT_GRACE_PERIOD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| ReactionsSettings::default().merkle_root_grace_period),
            },
            stacker_info: StackerInfo {
                public_signing_address,
                private_signing_key,
                public_encrypt_address: env::var("HN_PUBLIC_ENCRYPT_ADDRESS").unwrap_or_default(),
                private_encrypt_key: env::var("HN_PRIVATE_ENCRYPT_KEY").unwrap_or_default(),
            },
            redis: RedisSettings {
                connection_string: env::var("HN_REDIS_CONNECTION_STRING")
                    .unwrap_or_else(|_| RedisSettings::default().connection_string),
                instance_name: env::var("HN_REDIS_INSTANCE_NAME")
                    .unwrap_or_else(|_| RedisSettings::default().instance_name),
                enabled: env::var("HN_REDIS_ENABLED")
                    .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                    .unwrap_or(false),
            },
        })
    }

    /// The block producer's keypair, decoded from [`StackerInfo`].
    ///
    /// # Errors
    ///
    /// Returns an error if `private_signing_key` is not 64 hex characters.
    pub fn validator_keypair(&self) -> anyhow::Result<hn_crypto::Ed25519KeyPair> {
        let seed = hex::decode(&self.stacker_info.private_signing_key)
            .map_err(|e| anyhow::anyhow!("stacker private signing key is not valid hex: {e}"))?;
        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| anyhow::anyhow!("stacker private signing key must decode to 32 bytes"))?;
        Ok(hn_crypto::Ed25519KeyPair::from_seed(seed))
    }
}
