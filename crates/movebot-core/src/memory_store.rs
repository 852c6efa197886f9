use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{normalize_character, normalize_move_name, MoveRecord, MoveType, OwnerId},
    ports::{MoveStore, PutOutcome},
    Result,
};

/// In-process `MoveStore`. Records live in a `Vec` so listing keeps insertion
/// order; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryMoveStore {
    records: Mutex<Vec<MoveRecord>>,
}

impl MemoryMoveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

fn same_key(r: &MoveRecord, owner: OwnerId, character: &str, move_name: &str) -> bool {
    r.owner_id == owner && r.character_name == character && r.move_name == move_name
}

#[async_trait]
impl MoveStore for MemoryMoveStore {
    async fn put(
        &self,
        owner: OwnerId,
        character: &str,
        move_name: &str,
        move_type: MoveType,
    ) -> Result<PutOutcome> {
        let record = MoveRecord::new(owner, character, move_name, move_type);
        let mut records = self.records.lock().await;

        if let Some(existing) = records
            .iter_mut()
            .find(|r| same_key(r, owner, &record.character_name, &record.move_name))
        {
            existing.move_type = move_type;
            return Ok(PutOutcome::Replaced);
        }

        records.push(record);
        Ok(PutOutcome::Inserted)
    }

    async fn list(&self, owner: OwnerId, character: &str) -> Result<Vec<MoveRecord>> {
        let character = normalize_character(character);
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|r| r.owner_id == owner && r.character_name == character)
            .cloned()
            .collect())
    }

    async fn delete(&self, owner: OwnerId, character: &str, move_name: &str) -> Result<usize> {
        let character = normalize_character(character);
        let move_name = normalize_move_name(move_name);
        let mut records = self.records.lock().await;

        let before = records.len();
        records.retain(|r| !same_key(r, owner, &character, &move_name));
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_list_round_trips_lowercased_name() {
        let store = MemoryMoveStore::new();
        let out = store
            .put(OwnerId(1), "Ash", "Thunderbolt", MoveType::Medium)
            .await
            .unwrap();
        assert_eq!(out, PutOutcome::Inserted);

        let moves = store.list(OwnerId(1), "Ash").await.unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].move_name, "thunderbolt");
        assert_eq!(moves[0].move_type, MoveType::Medium);
        assert_eq!(moves[0].move_type.as_str(), "Medium");
    }

    #[tokio::test]
    async fn repeated_put_replaces_instead_of_duplicating() {
        let store = MemoryMoveStore::new();
        store
            .put(OwnerId(1), "Ash", "tackle", MoveType::Light)
            .await
            .unwrap();
        let out = store
            .put(OwnerId(1), "Ash", "TACKLE", MoveType::Heavy)
            .await
            .unwrap();
        assert_eq!(out, PutOutcome::Replaced);

        let moves = store.list(OwnerId(1), "Ash").await.unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].move_type, MoveType::Heavy);
    }

    #[tokio::test]
    async fn owners_are_isolated() {
        let store = MemoryMoveStore::new();
        store
            .put(OwnerId(1), "Ash", "thunderbolt", MoveType::Medium)
            .await
            .unwrap();

        assert!(store.list(OwnerId(2), "Ash").await.unwrap().is_empty());
        assert_eq!(
            store.delete(OwnerId(2), "Ash", "thunderbolt").await.unwrap(),
            0
        );
        assert_eq!(store.list(OwnerId(1), "Ash").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn characters_match_case_sensitively() {
        let store = MemoryMoveStore::new();
        store
            .put(OwnerId(1), "Ash", "thunderbolt", MoveType::Medium)
            .await
            .unwrap();
        assert!(store.list(OwnerId(1), "ash").await.unwrap().is_empty());
        assert_eq!(store.list(OwnerId(1), " Ash ").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_key_is_zero() {
        let store = MemoryMoveStore::new();
        assert_eq!(store.delete(OwnerId(1), "Ash", "surf").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_matches_move_case_insensitively_and_keeps_order() {
        let store = MemoryMoveStore::new();
        for m in ["tackle", "surf", "growl"] {
            store
                .put(OwnerId(1), "Ash", m, MoveType::Light)
                .await
                .unwrap();
        }
        assert_eq!(store.delete(OwnerId(1), "Ash", "Surf").await.unwrap(), 1);

        let names: Vec<String> = store
            .list(OwnerId(1), "Ash")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.move_name)
            .collect();
        assert_eq!(names, vec!["tackle", "growl"]);
    }
}
