//! `HushIdentity` (spec §6): profile lookup and display-name search.

use hn_persistence::PersistenceFacade;
use hn_types::{IdentityProfile, PublicAddress};

pub struct IdentityHandler {
    persistence: PersistenceFacade,
}

impl IdentityHandler {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }

    /// `GetIdentity({publicSigningAddress}) → Profile|{notFound}`.
    #[must_use]
    pub fn get_identity(&self, address: &PublicAddress) -> Option<IdentityProfile> {
        self.persistence
            .create_read_only()
            .identity()
            .get_profile(address)
            .ok()
            .flatten()
    }

    /// `SearchByDisplayName({partial}) → Profile[]`.
    ///
    /// Matches a case-insensitive substring of either `alias` or
    /// `short_alias`; private profiles (`is_public == false`) never match.
    #[must_use]
    pub fn search_by_display_name(&self, partial: &str) -> Vec<IdentityProfile> {
        let needle = partial.to_lowercase();
        self.persistence
            .create_read_only()
            .identity()
            .list_profiles()
            .unwrap_or_default()
            .into_iter()
            .filter(|profile| profile.is_public)
            .filter(|profile| {
                profile.alias.to_lowercase().contains(&needle)
                    || profile.short_alias.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_types::BlockIndex;

    fn profile(alias: &str, short_alias: &str, is_public: bool) -> IdentityProfile {
        IdentityProfile {
            public_signing_address: PublicAddress(alias.into()),
            alias: alias.into(),
            short_alias: short_alias.into(),
            public_encrypt_address: PublicAddress(format!("{alias}-enc")),
            is_public,
            block_index: BlockIndex::GENESIS,
        }
    }

    #[tokio::test]
    async fn an_unknown_address_has_no_identity() {
        let handler = IdentityHandler::new(PersistenceFacade::new());
        assert!(handler.get_identity(&PublicAddress("nobody".into())).is_none());
    }

    #[tokio::test]
    async fn search_matches_a_public_profile_case_insensitively() {
        let persistence = PersistenceFacade::new();
        let uow = persistence.create_writable();
        uow.identity().upsert_profile(&profile("Alice", "al", true)).unwrap();
        uow.identity().upsert_profile(&profile("Bob", "bb", true)).unwrap();
        uow.commit().await.unwrap();

        let handler = IdentityHandler::new(persistence);
        let results = handler.search_by_display_name("ALI");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].alias, "Alice");
    }

    #[tokio::test]
    async fn search_excludes_private_profiles() {
        let persistence = PersistenceFacade::new();
        let uow = persistence.create_writable();
        uow.identity().upsert_profile(&profile("Carol", "ca", false)).unwrap();
        uow.commit().await.unwrap();

        let handler = IdentityHandler::new(persistence);
        assert!(handler.search_by_display_name("carol").is_empty());
    }
}
