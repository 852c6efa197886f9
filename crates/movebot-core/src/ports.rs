use async_trait::async_trait;

use crate::{
    domain::{MoveData, MoveRecord, MoveType, OwnerId},
    Result,
};

/// What a `put` did to the natural key (owner, character, move).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    Inserted,
    /// A record with the same key existed; its type was overwritten.
    Replaced,
}

/// Hexagonal port for move record persistence.
///
/// Every operation is scoped to one owner and one character. Implementations
/// normalize keys the same way `MoveRecord::new` does (character trimmed,
/// move name trimmed + lower-cased) and never retry a failed backend call:
/// failures surface as `Error::StoreUnavailable`.
#[async_trait]
pub trait MoveStore: Send + Sync {
    async fn put(
        &self,
        owner: OwnerId,
        character: &str,
        move_name: &str,
        move_type: MoveType,
    ) -> Result<PutOutcome>;

    /// All records of `(owner, character)` in insertion order.
    async fn list(&self, owner: OwnerId, character: &str) -> Result<Vec<MoveRecord>>;

    /// Delete by exact key; returns how many records were removed.
    async fn delete(&self, owner: OwnerId, character: &str, move_name: &str) -> Result<usize>;
}

/// Hexagonal port for the external move-attribute source.
///
/// The PokeAPI adapter is the production implementation; failures are
/// reported as `Error::Lookup`.
#[async_trait]
pub trait MoveLookup: Send + Sync {
    async fn fetch_move(&self, name: &str) -> Result<MoveData>;
}
