//! Move registration service: lookup + classification + persistence.
//!
//! Each operation is all-or-nothing: a failed lookup or an invalid move type
//! returns before anything reaches the store.

use std::sync::Arc;

use crate::{
    classifier::classify,
    domain::{normalize_character, normalize_move_name, MoveRecord, MoveType, OwnerId},
    errors::Error,
    ports::{MoveLookup, MoveStore, PutOutcome},
    Result,
};

/// A move that was just persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registered {
    pub character: String,
    /// Name as shown back to the user (canonical for lookups, as typed for
    /// custom moves).
    pub move_name: String,
    pub move_type: MoveType,
    pub outcome: PutOutcome,
}

pub struct MoveService {
    store: Arc<dyn MoveStore>,
    lookup: Arc<dyn MoveLookup>,
}

impl MoveService {
    pub fn new(store: Arc<dyn MoveStore>, lookup: Arc<dyn MoveLookup>) -> Self {
        Self { store, lookup }
    }

    /// Register a move whose type is derived from the external move data.
    pub async fn learn(
        &self,
        owner: OwnerId,
        character: &str,
        move_name: &str,
    ) -> Result<Registered> {
        let character = required("character", character)?;
        let key = required("move", move_name)?.to_lowercase();

        let data = self.lookup.fetch_move(&key).await.inspect_err(|e| {
            tracing::warn!(
                owner = owner.0,
                %character,
                move_name = %key,
                error = %e,
                "move lookup failed"
            );
        })?;

        let move_type = classify(data.damage_class, data.base_power, &data.canonical_name);
        let outcome = self
            .persist(owner, &character, &data.canonical_name, move_type)
            .await?;

        Ok(Registered {
            character,
            move_name: normalize_move_name(&data.canonical_name),
            move_type,
            outcome,
        })
    }

    /// Register a move with a user-supplied type (case-insensitive).
    pub async fn custom_move(
        &self,
        owner: OwnerId,
        character: &str,
        move_name: &str,
        move_type: &str,
    ) -> Result<Registered> {
        let move_type: MoveType = move_type.parse().inspect_err(|e| {
            tracing::warn!(owner = owner.0, error = %e, "rejected custom move type");
        })?;
        let character = required("character", character)?;
        let display = required("move", move_name)?;

        let outcome = self.persist(owner, &character, &display, move_type).await?;

        Ok(Registered {
            character,
            move_name: display,
            move_type,
            outcome,
        })
    }

    /// All moves of a character. Empty is a normal outcome.
    pub async fn moves(&self, owner: OwnerId, character: &str) -> Result<Vec<MoveRecord>> {
        let character = normalize_character(character);
        self.store
            .list(owner, &character)
            .await
            .inspect_err(|e| tracing::error!(owner = owner.0, error = %e, "listing moves failed"))
    }

    /// Delete a move; `true` when a record was found and removed.
    pub async fn forget(&self, owner: OwnerId, character: &str, move_name: &str) -> Result<bool> {
        let character = normalize_character(character);
        let removed = self
            .store
            .delete(owner, &character, move_name)
            .await
            .inspect_err(|e| tracing::error!(owner = owner.0, error = %e, "deleting move failed"))?;

        if removed > 0 {
            tracing::info!(
                owner = owner.0,
                %character,
                move_name = %normalize_move_name(move_name),
                removed,
                "move forgotten"
            );
        }
        Ok(removed > 0)
    }

    async fn persist(
        &self,
        owner: OwnerId,
        character: &str,
        move_name: &str,
        move_type: MoveType,
    ) -> Result<PutOutcome> {
        let outcome = self
            .store
            .put(owner, character, move_name, move_type)
            .await
            .inspect_err(|e| tracing::error!(owner = owner.0, error = %e, "saving move failed"))?;

        tracing::info!(
            owner = owner.0,
            %character,
            move_name = %normalize_move_name(move_name),
            move_type = move_type.as_str(),
            ?outcome,
            "move registered"
        );
        Ok(outcome)
    }
}

fn required(what: &str, value: &str) -> Result<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(Error::InvalidArgument(format!("{what} name must not be empty")));
    }
    Ok(v.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{DamageClass, MoveData},
        errors::LookupError,
        memory_store::MemoryMoveStore,
    };

    /// Lookup backed by a fixed table; records every name it was asked for.
    #[derive(Default)]
    pub(crate) struct FakeLookup {
        pub moves: Vec<MoveData>,
        pub transport_down: bool,
        pub asked: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        pub(crate) fn with(moves: Vec<MoveData>) -> Self {
            Self {
                moves,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl MoveLookup for FakeLookup {
        async fn fetch_move(&self, name: &str) -> Result<MoveData> {
            self.asked.lock().unwrap().push(name.to_string());
            if self.transport_down {
                return Err(LookupError::Transport("connection refused".to_string()).into());
            }
            self.moves
                .iter()
                .find(|m| m.canonical_name == name)
                .cloned()
                .ok_or_else(|| LookupError::NotFound(name.to_string()).into())
        }
    }

    /// Store whose backend is gone.
    pub(crate) struct DownStore;

    #[async_trait]
    impl MoveStore for DownStore {
        async fn put(
            &self,
            _owner: OwnerId,
            _character: &str,
            _move_name: &str,
            _move_type: MoveType,
        ) -> Result<PutOutcome> {
            Err(Error::StoreUnavailable("connection lost".to_string()))
        }

        async fn list(&self, _owner: OwnerId, _character: &str) -> Result<Vec<MoveRecord>> {
            Err(Error::StoreUnavailable("connection lost".to_string()))
        }

        async fn delete(
            &self,
            _owner: OwnerId,
            _character: &str,
            _move_name: &str,
        ) -> Result<usize> {
            Err(Error::StoreUnavailable("connection lost".to_string()))
        }
    }

    pub(crate) fn pokedex() -> Vec<MoveData> {
        vec![
            MoveData {
                canonical_name: "thunderbolt".to_string(),
                damage_class: Some(DamageClass::Special),
                base_power: Some(90),
            },
            MoveData {
                canonical_name: "tackle".to_string(),
                damage_class: Some(DamageClass::Physical),
                base_power: Some(40),
            },
            MoveData {
                canonical_name: "thunder-wave".to_string(),
                damage_class: Some(DamageClass::Status),
                base_power: None,
            },
            MoveData {
                canonical_name: "sonic-boom".to_string(),
                damage_class: Some(DamageClass::Special),
                base_power: None,
            },
        ]
    }

    fn service(store: Arc<dyn MoveStore>, lookup: FakeLookup) -> MoveService {
        MoveService::new(store, Arc::new(lookup))
    }

    #[tokio::test]
    async fn learn_classifies_and_persists() {
        let store = Arc::new(MemoryMoveStore::new());
        let svc = service(store.clone(), FakeLookup::with(pokedex()));

        let reg = svc.learn(OwnerId(1), "Ash", "Thunderbolt").await.unwrap();
        assert_eq!(reg.move_name, "thunderbolt");
        assert_eq!(reg.move_type, MoveType::Medium);
        assert_eq!(reg.outcome, PutOutcome::Inserted);

        let moves = store.list(OwnerId(1), "Ash").await.unwrap();
        let expected = MoveRecord::new(OwnerId(1), "Ash", "thunderbolt", MoveType::Medium);
        assert_eq!(moves, vec![expected]);
    }

    #[tokio::test]
    async fn learn_queries_lookup_with_lowercased_name() {
        let lookup = Arc::new(FakeLookup::with(pokedex()));
        let svc = MoveService::new(Arc::new(MemoryMoveStore::new()), lookup.clone());

        svc.learn(OwnerId(1), "Ash", " TACKLE ").await.unwrap();
        assert_eq!(*lookup.asked.lock().unwrap(), vec!["tackle".to_string()]);
    }

    #[tokio::test]
    async fn learn_uses_curated_names_after_lookup() {
        let svc = service(
            Arc::new(MemoryMoveStore::new()),
            FakeLookup::with(pokedex()),
        );
        let reg = svc.learn(OwnerId(1), "Ash", "sonic-boom").await.unwrap();
        assert_eq!(reg.move_type, MoveType::Unique);

        let reg = svc.learn(OwnerId(1), "Ash", "thunder-wave").await.unwrap();
        assert_eq!(reg.move_type, MoveType::Status);
    }

    #[tokio::test]
    async fn failed_lookup_persists_nothing() {
        let store = Arc::new(MemoryMoveStore::new());
        let svc = service(store.clone(), FakeLookup::with(pokedex()));

        let err = svc.learn(OwnerId(1), "Ash", "not-a-move").await.unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::NotFound(_))));
        assert!(store.is_empty().await);

        let down = FakeLookup {
            transport_down: true,
            ..FakeLookup::with(pokedex())
        };
        let svc = service(store.clone(), down);
        let err = svc.learn(OwnerId(1), "Ash", "tackle").await.unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::Transport(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn custom_move_capitalizes_type() {
        let store = Arc::new(MemoryMoveStore::new());
        let svc = service(store.clone(), FakeLookup::default());

        let reg = svc
            .custom_move(OwnerId(1), "Pikachu", "Thunder-Wave", "sTaTuS")
            .await
            .unwrap();
        assert_eq!(reg.move_type, MoveType::Status);
        assert_eq!(reg.move_name, "Thunder-Wave");

        let moves = store.list(OwnerId(1), "Pikachu").await.unwrap();
        assert_eq!(moves[0].move_name, "thunder-wave");
        assert_eq!(moves[0].move_type.as_str(), "Status");
    }

    #[tokio::test]
    async fn custom_move_rejects_unknown_type() {
        let store = Arc::new(MemoryMoveStore::new());
        let svc = service(store.clone(), FakeLookup::default());

        let err = svc
            .custom_move(OwnerId(1), "Pikachu", "zap", "banana")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn custom_move_rejects_blank_names() {
        let svc = service(Arc::new(MemoryMoveStore::new()), FakeLookup::default());
        let err = svc
            .custom_move(OwnerId(1), "  ", "zap", "light")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn repeated_learn_replaces() {
        let svc = service(
            Arc::new(MemoryMoveStore::new()),
            FakeLookup::with(pokedex()),
        );
        svc.custom_move(OwnerId(1), "Ash", "tackle", "heavy")
            .await
            .unwrap();
        let reg = svc.learn(OwnerId(1), "Ash", "tackle").await.unwrap();
        assert_eq!(reg.outcome, PutOutcome::Replaced);

        let moves = svc.moves(OwnerId(1), "Ash").await.unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].move_type, MoveType::Light);
    }

    #[tokio::test]
    async fn forget_reports_whether_anything_was_removed() {
        let svc = service(
            Arc::new(MemoryMoveStore::new()),
            FakeLookup::with(pokedex()),
        );
        svc.learn(OwnerId(1), "Ash", "tackle").await.unwrap();

        assert!(!svc.forget(OwnerId(2), "Ash", "tackle").await.unwrap());
        assert!(svc.forget(OwnerId(1), "Ash", "Tackle").await.unwrap());
        assert!(!svc.forget(OwnerId(1), "Ash", "tackle").await.unwrap());
        assert!(svc.moves(OwnerId(1), "Ash").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_outage_is_surfaced() {
        let svc = service(Arc::new(DownStore), FakeLookup::with(pokedex()));
        assert!(matches!(
            svc.learn(OwnerId(1), "Ash", "tackle").await.unwrap_err(),
            Error::StoreUnavailable(_)
        ));
        assert!(matches!(
            svc.moves(OwnerId(1), "Ash").await.unwrap_err(),
            Error::StoreUnavailable(_)
        ));
        assert!(matches!(
            svc.forget(OwnerId(1), "Ash", "tackle").await.unwrap_err(),
            Error::StoreUnavailable(_)
        ));
    }
}
