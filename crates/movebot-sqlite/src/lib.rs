//! SQLite adapter for the move record store.
//!
//! One connection is opened at startup and shared by every command. Each call
//! runs on tokio's blocking pool so a slow disk never stalls other updates.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use movebot_core::{
    domain::{normalize_character, normalize_move_name, MoveRecord, MoveType, OwnerId},
    errors::Error,
    ports::{MoveStore, PutOutcome},
    Result,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS moves (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL,
    character_name TEXT NOT NULL,
    move_name TEXT NOT NULL,
    move_type TEXT NOT NULL
        CHECK (move_type IN ('Light', 'Medium', 'Heavy', 'Status', 'Unique'))
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_moves_key
    ON moves(owner_id, character_name, move_name);
"#;

pub struct SqliteMoveStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl SqliteMoveStore {
    /// Open or create the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            Error::StoreUnavailable(format!("failed to open {}: {e}", path.display()))
        })?;
        Self::init(conn, path.to_path_buf())
    }

    /// Throwaway in-memory database (tests, dry runs).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        Self::init(conn, PathBuf::from(":memory:"))
    }

    fn init(conn: Connection, db_path: PathBuf) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        tracing::info!(path = %db_path.display(), "move store ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Close the connection. Fails if a command still holds a handle to it.
    pub fn close(self) -> Result<()> {
        let conn = Arc::try_unwrap(self.conn)
            .map_err(|_| Error::StoreUnavailable("store is still in use".to_string()))?
            .into_inner()
            .map_err(|_| Error::StoreUnavailable("store lock poisoned".to_string()))?;
        conn.close().map_err(|(_, e)| store_err(e))?;
        tracing::info!(path = %self.db_path.display(), "move store closed");
        Ok(())
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| Error::StoreUnavailable("store lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| Error::StoreUnavailable(format!("store task failed: {e}")))?
    }
}

/// Constraint violations mean bad input; everything else is the backend.
fn store_err(e: rusqlite::Error) -> Error {
    match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => Error::InvalidArgument(e.to_string()),
        _ => Error::StoreUnavailable(e.to_string()),
    }
}

#[async_trait]
impl MoveStore for SqliteMoveStore {
    async fn put(
        &self,
        owner: OwnerId,
        character: &str,
        move_name: &str,
        move_type: MoveType,
    ) -> Result<PutOutcome> {
        let record = MoveRecord::new(owner, character, move_name, move_type);
        self.with_conn(move |conn| {
            let updated = conn
                .execute(
                    "UPDATE moves SET move_type = ?1
                     WHERE owner_id = ?2 AND character_name = ?3 AND move_name = ?4",
                    params![
                        record.move_type.as_str(),
                        record.owner_id.0,
                        &record.character_name,
                        &record.move_name
                    ],
                )
                .map_err(store_err)?;
            if updated > 0 {
                return Ok(PutOutcome::Replaced);
            }

            conn.execute(
                "INSERT INTO moves (owner_id, character_name, move_name, move_type)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.owner_id.0,
                    &record.character_name,
                    &record.move_name,
                    record.move_type.as_str()
                ],
            )
            .map_err(store_err)?;
            Ok(PutOutcome::Inserted)
        })
        .await
    }

    async fn list(&self, owner: OwnerId, character: &str) -> Result<Vec<MoveRecord>> {
        let character = normalize_character(character);
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT owner_id, character_name, move_name, move_type FROM moves
                     WHERE owner_id = ?1 AND character_name = ?2
                     ORDER BY id",
                )
                .map_err(store_err)?;

            let rows = stmt
                .query_map(params![owner.0, &character], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                })
                .map_err(store_err)?;

            let mut out = Vec::new();
            for row in rows {
                let (owner_id, character_name, move_name, move_type) = row.map_err(store_err)?;
                out.push(MoveRecord {
                    owner_id: OwnerId(owner_id),
                    character_name,
                    move_name,
                    move_type: parse_stored_type(&move_type)?,
                });
            }
            Ok(out)
        })
        .await
    }

    async fn delete(&self, owner: OwnerId, character: &str, move_name: &str) -> Result<usize> {
        let character = normalize_character(character);
        let move_name = normalize_move_name(move_name);
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM moves
                 WHERE owner_id = ?1 AND character_name = ?2 AND move_name = ?3",
                params![owner.0, &character, &move_name],
            )
            .map_err(store_err)
        })
        .await
    }
}

/// Stored tags must be canonical; anything else means the table was edited
/// behind our back.
fn parse_stored_type(raw: &str) -> Result<MoveType> {
    MoveType::ALL
        .into_iter()
        .find(|t| t.as_str() == raw)
        .ok_or_else(|| Error::InvalidArgument(format!("stored move type '{raw}' is not valid")))
}
