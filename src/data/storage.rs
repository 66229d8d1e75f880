use {
    super::{MarketError, Result},
    crate::config::{DF, PERSISTENCE},
    async_trait::async_trait,
    sqlx::{
        ConnectOptions, Pool, Row, Sqlite,
        sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    },
    std::{collections::HashMap, str::FromStr, sync::Mutex, time::Duration},
};

/// Durable string-to-string storage. Holds cached API responses and the
/// favorites list. Growth is unbounded; nothing is evicted.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub struct SqliteKvStore {
    pool: Pool<Sqlite>,
}

impl SqliteKvStore {
    /// Opens (creating if missing) the database at `db_path` and ensures the table exists.
    pub async fn new(db_path: &str) -> Result<Self> {
        let connection_options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10))
            .synchronous(SqliteSynchronous::Normal)
            .log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(2));

        Self::connect(connection_options).await
    }

    /// Private database that vanishes with the process.
    pub async fn in_memory() -> Result<Self> {
        let connection_options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(connection_options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(PERSISTENCE.store.max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );
            "#,
            PERSISTENCE.store.table
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query(&format!(
            "SELECT value FROM {} WHERE key = ?",
            PERSISTENCE.store.table
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        #[cfg(debug_assertions)]
        if DF.log_storage {
            log::debug!("kv get {} -> {}", key, if row.is_some() { "hit" } else { "miss" });
        }

        row.map(|r| r.try_get::<String, _>("value"))
            .transpose()
            .map_err(MarketError::from)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO {} (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            PERSISTENCE.store.table
        ))
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        #[cfg(debug_assertions)]
        if DF.log_storage {
            log::debug!("kv set {} ({} bytes)", key, value.len());
        }

        Ok(())
    }
}

/// Process-local store. Used by tests and as a fallback when the database
/// cannot be opened.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| MarketError::Storage("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("favorites").await.unwrap(), None);

        store.set("favorites", "[]").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap().as_deref(), Some("[]"));

        store.set("favorites", "[1]").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap().as_deref(), Some("[1]"));

        assert_eq!(store.get("cache_other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_round_trips_and_overwrites() {
        exercise(&MemoryKvStore::new()).await;
    }

    #[tokio::test]
    async fn sqlite_store_round_trips_and_overwrites() {
        let store = SqliteKvStore::in_memory().await.unwrap();
        exercise(&store).await;
    }
}
