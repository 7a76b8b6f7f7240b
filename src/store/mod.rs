pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::storage::LocalStorage;
use disk::FjallStorage;
use memory::MemoryStorage;
use std::sync::Arc;
use tracing::warn;

/// Opens the persistent local storage under the configured data path.
///
/// Storage is best-effort: when the keyspace cannot be opened the session
/// runs with in-memory storage instead.
pub fn open_local_storage(config: &AppConfig) -> Arc<dyn LocalStorage> {
    let opened = config
        .data_path()
        .and_then(|path| FjallStorage::open(&path.join("storage")));

    match opened {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            warn!(error = %e, "Local storage unavailable, recent tokens will not persist");
            Arc::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_local_storage_uses_data_path() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_path: Some(temp_dir.path().to_string_lossy().to_string()),
            ..AppConfig::default()
        };

        let storage = open_local_storage(&config);
        storage.set_item("recent", "[]").unwrap();

        assert!(temp_dir.path().join("storage").exists());
        assert_eq!(storage.get_item("recent").unwrap().as_deref(), Some("[]"));
    }
}
