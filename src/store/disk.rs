use crate::core::storage::LocalStorage;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "local_storage";

/// Local storage persisted in a fjall keyspace.
pub struct FjallStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open storage at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open storage partition")?;

        debug!("Opened local storage at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl LocalStorage for FjallStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let Some(value) = self
            .partition
            .get(key)
            .with_context(|| format!("Failed to read key '{key}'"))?
        else {
            return Ok(None);
        };
        let text = std::str::from_utf8(&value)
            .with_context(|| format!("Stored value for '{key}' is not UTF-8"))?;
        Ok(Some(text.to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.partition
            .insert(key, value)
            .with_context(|| format!("Failed to write key '{key}'"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush storage")?;
        debug!("Stored key '{}'", key);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.partition
            .remove(key)
            .with_context(|| format!("Failed to remove key '{key}'"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush storage")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fjall_storage_set_get_remove() {
        let dir = tempdir().unwrap();
        let storage = FjallStorage::open(dir.path()).unwrap();

        assert_eq!(storage.get_item("recent").unwrap(), None);

        storage.set_item("recent", r#"[{"id":"dai"}]"#).unwrap();
        assert_eq!(
            storage.get_item("recent").unwrap().as_deref(),
            Some(r#"[{"id":"dai"}]"#)
        );

        storage.remove_item("recent").unwrap();
        assert_eq!(storage.get_item("recent").unwrap(), None);
    }
}
