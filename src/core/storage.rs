//! Local key-value storage abstraction

use anyhow::Result;

/// String key/value storage with the shape of browser local storage.
///
/// Calls are synchronous and best-effort; callers decide whether a failure
/// matters.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}
