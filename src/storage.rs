//! SQLite store linking Telegram users to faceit nicknames.
//!
//! Every operation opens its own connection and drops it before returning.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{error, info, instrument};

use crate::error::StorageError;
use crate::model::UserRegistration;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        telegram_id INTEGER PRIMARY KEY,
        faceit_nickname TEXT NOT NULL,
        registered_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_telegram_id ON users (telegram_id);
    CREATE INDEX IF NOT EXISTS idx_faceit_nickname ON users (faceit_nickname);
";

#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Create the `users` table and its indexes if they do not exist yet.
    pub fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Delete the database file at `path` and create an empty schema.
    pub fn reset(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if path.exists() {
            std::fs::remove_file(path)?;
            info!(path = %path.display(), "removed existing database");
        }
        let storage = Self::new(path);
        storage.init_schema()?;
        info!(path = %path.display(), "database created");
        Ok(storage)
    }

    /// Nickname registered for `telegram_id`.
    ///
    /// Storage failures are logged and reported as `None`.
    #[instrument(skip(self))]
    pub fn lookup_nickname(&self, telegram_id: i64) -> Option<String> {
        match self.find_nickname(telegram_id) {
            Ok(Some(nickname)) => {
                info!(nickname = %nickname, "found registered nickname");
                Some(nickname)
            }
            Ok(None) => {
                info!("user is not registered");
                None
            }
            Err(e) => {
                error!(error = %e, "database error while looking up nickname");
                None
            }
        }
    }

    fn find_nickname(&self, telegram_id: i64) -> Result<Option<String>, StorageError> {
        let conn = self.connect()?;
        let nickname = conn
            .query_row(
                "SELECT faceit_nickname FROM users WHERE telegram_id = ?1",
                params![telegram_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(nickname)
    }

    /// Insert a registration, or replace the nickname and refresh the
    /// timestamp of an existing one. Runs in a single transaction.
    #[instrument(skip(self))]
    pub fn upsert_registration(&self, telegram_id: i64, nickname: &str) -> Result<(), StorageError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT telegram_id FROM users WHERE telegram_id = ?1",
                params![telegram_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some();

        if exists {
            tx.execute(
                "UPDATE users SET faceit_nickname = ?1, registered_at = ?2 WHERE telegram_id = ?3",
                params![nickname, Utc::now().naive_utc(), telegram_id],
            )?;
            info!("updated registration");
        } else {
            tx.execute(
                "INSERT INTO users (telegram_id, faceit_nickname, registered_at) VALUES (?1, ?2, ?3)",
                params![telegram_id, nickname, Utc::now().naive_utc()],
            )?;
            info!("registered new user");
        }

        tx.commit()?;
        Ok(())
    }

    /// Full registration row for `telegram_id`.
    pub fn registration(&self, telegram_id: i64) -> Result<Option<UserRegistration>, StorageError> {
        let conn = self.connect()?;
        let registration = conn
            .query_row(
                "SELECT telegram_id, faceit_nickname, registered_at FROM users WHERE telegram_id = ?1",
                params![telegram_id],
                parse_registration_row,
            )
            .optional()?;
        Ok(registration)
    }

    /// Number of rows stored for `telegram_id` (0 or 1).
    pub fn count_registrations(&self, telegram_id: i64) -> Result<u32, StorageError> {
        let conn = self.connect()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE telegram_id = ?1",
            params![telegram_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn parse_registration_row(row: &rusqlite::Row) -> rusqlite::Result<UserRegistration> {
    Ok(UserRegistration {
        telegram_id: row.get(0)?,
        faceit_nickname: row.get(1)?,
        registered_at: row.get(2)?,
    })
}
