use crate::api::models::UserId;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

const TOKEN_KEY: &str = "token";
const USER_ID_KEY: &str = "user_id";

/// Error type for durable storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}

/// What survives a reload: the bearer token and the numeric user id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredCredentials {
    pub token: Option<String>,
    pub user_id: Option<UserId>,
}

pub trait CredentialStorage {
    fn load(&self) -> Result<StoredCredentials, StorageError>;
    fn store_token(&self, token: &str) -> Result<(), StorageError>;
    fn store_user_id(&self, user_id: UserId) -> Result<(), StorageError>;
    /// Removes token and user id together.
    fn clear(&self) -> Result<(), StorageError>;
}

fn parse_user_id(raw: Option<String>) -> Result<Option<UserId>, StorageError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<UserId>()
            .map_err(|_| StorageError::Corrupt(format!("user id {value:?}")))
    })
    .transpose()
}

// Native: a small SQLite key/value table in the platform data directory.

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DurableStorage {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DurableStorage {
    pub fn open_default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("orchestra"))
            .unwrap_or_else(|| PathBuf::from(".orchestra"));
        if let Err(err) = std::fs::create_dir_all(&data_dir) {
            tracing::warn!(path = %data_dir.display(), "cannot create data dir: {err}");
        }
        Self::at(data_dir.join("orchestra.db"))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connection(&self) -> Result<rusqlite::Connection, StorageError> {
        let conn = rusqlite::Connection::open(&self.path)
            .map_err(|e| StorageError::Unavailable(format!("Failed to open database: {e}")))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(conn)
    }

    fn read_key(conn: &rusqlite::Connection, key: &str) -> Result<Option<String>, StorageError> {
        let result = conn.query_row(
            "SELECT value FROM session WHERE key = ?1",
            [key],
            |row: &rusqlite::Row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            [key, value],
        )
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CredentialStorage for DurableStorage {
    fn load(&self) -> Result<StoredCredentials, StorageError> {
        let conn = self.connection()?;
        Ok(StoredCredentials {
            token: Self::read_key(&conn, TOKEN_KEY)?.filter(|token| !token.is_empty()),
            user_id: parse_user_id(Self::read_key(&conn, USER_ID_KEY)?)?,
        })
    }

    fn store_token(&self, token: &str) -> Result<(), StorageError> {
        self.write_key(TOKEN_KEY, token)
    }

    fn store_user_id(&self, user_id: UserId) -> Result<(), StorageError> {
        self.write_key(USER_ID_KEY, &user_id.to_string())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM session WHERE key IN (?1, ?2)",
            [TOKEN_KEY, USER_ID_KEY],
        )
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

// Web: plain strings in localStorage, the same keys the site has always used.

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct DurableStorage;

#[cfg(target_arch = "wasm32")]
impl DurableStorage {
    pub fn open_default() -> Self {
        Self
    }

    fn read_key(key: &str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn write_key(key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl CredentialStorage for DurableStorage {
    fn load(&self) -> Result<StoredCredentials, StorageError> {
        Ok(StoredCredentials {
            token: Self::read_key(TOKEN_KEY)?.filter(|token| !token.is_empty()),
            user_id: parse_user_id(Self::read_key(USER_ID_KEY)?)?,
        })
    }

    fn store_token(&self, token: &str) -> Result<(), StorageError> {
        Self::write_key(TOKEN_KEY, token)
    }

    fn store_user_id(&self, user_id: UserId) -> Result<(), StorageError> {
        Self::write_key(USER_ID_KEY, &user_id.to_string())
    }

    fn clear(&self) -> Result<(), StorageError> {
        LocalStorage::delete(TOKEN_KEY);
        LocalStorage::delete(USER_ID_KEY);
        Ok(())
    }
}
