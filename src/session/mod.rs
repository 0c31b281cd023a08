use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Key the last successful prediction is stored under
pub const RESULT_KEY: &str = "prediction_result";

/// Session-scoped string key/value storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Drop every entry
    async fn clear(&self) -> Result<()>;
}

/// Store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// Store persisted as a JSON object file, so separate CLI runs share a session
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: RwLock<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt session file {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read session file {}", self.path.display())),
        }
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.read().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;

        debug!("Stored '{}' in {}", key, self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove session file {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_session_file(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("house_price_predictor_{label}_{suffix}"))
            .join("session.json")
    }

    #[tokio::test]
    async fn memory_store_overwrites_and_clears() {
        let store = MemoryStore::new();
        assert_eq!(store.get(RESULT_KEY).await.unwrap(), None);

        store.set(RESULT_KEY, "first").await.unwrap();
        store.set(RESULT_KEY, "second").await.unwrap();
        assert_eq!(store.get(RESULT_KEY).await.unwrap().as_deref(), Some("second"));

        store.clear().await.unwrap();
        assert_eq!(store.get(RESULT_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let path = temp_session_file("reopen");

        let store = FileStore::new(&path);
        assert_eq!(store.get(RESULT_KEY).await.unwrap(), None);
        store.set(RESULT_KEY, r#"{"predictions":[1]}"#).await.unwrap();
        store.set("other", "x").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get(RESULT_KEY).await.unwrap().as_deref(),
            Some(r#"{"predictions":[1]}"#)
        );
        assert_eq!(reopened.get("other").await.unwrap().as_deref(), Some("x"));

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(store.get(RESULT_KEY).await.unwrap(), None);
        // clearing twice is fine
        reopened.clear().await.unwrap();

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).expect("cleanup");
        }
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_file() {
        let path = temp_session_file("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get(RESULT_KEY).await.is_err());

        std::fs::remove_dir_all(path.parent().unwrap()).expect("cleanup");
    }
}
