//! Key-value persistence for the best score.
//!
//! Native builds keep a small TOML table on disk, the browser build uses
//! `localStorage`. Every failure degrades to a session-only best score.
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::utils::errors::{BoneGameError, BoneGameResult};

/// String get/set store. `Send + Sync` so it can live inside a Bevy resource.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> BoneGameResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> BoneGameResult<()>;
}

/// In-process store. Used as the session-only fallback and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoneGameResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> BoneGameResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML file of string keys. A missing file reads as empty.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_table(&self) -> BoneGameResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoneGameResult<Option<String>> {
        Ok(self.read_table()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> BoneGameResult<()> {
        // A corrupt file is replaced rather than blocking every later write
        let mut table = match self.read_table() {
            Err(BoneGameError::ConfigParse(e)) => {
                log::warn!("Overwriting unreadable store {}: {e}", self.path.display());
                BTreeMap::new()
            }
            other => other?,
        };
        table.insert(key.to_string(), value.to_string());
        std::fs::write(&self.path, toml::to_string(&table)?)?;
        Ok(())
    }
}

/// Browser `localStorage`. The handle is looked up on every call so the store
/// stays `Send + Sync`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> BoneGameResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or_else(|| {
                BoneGameError::StorageUnavailable("localStorage is not accessible".into())
            })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> BoneGameResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| BoneGameError::StorageUnavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> BoneGameResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| BoneGameError::StorageUnavailable(format!("{e:?}")))
    }
}

/// Platform store: `localStorage` in the browser, a TOML file elsewhere.
pub fn platform_store(path: Option<PathBuf>) -> Box<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = path;
        Box::new(LocalStorageStore)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use crate::utils::constants::storage_constants::SCORE_FILE_NAME;
        let path = path.unwrap_or_else(|| std::env::temp_dir().join(SCORE_FILE_NAME));
        Box::new(FileStore::new(path))
    }
}

/// Reads the stored best score. Unavailable storage or a malformed value counts as 0.
pub fn load_high_score(store: &dyn KeyValueStore, key: &str) -> u32 {
    match store.get(key) {
        Ok(Some(value)) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed stored high score {value:?}");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("High score unavailable, keeping it for this session only: {e}");
            0
        }
    }
}

/// Writes the best score as a base-10 string.
pub fn save_high_score(store: &mut dyn KeyValueStore, key: &str, score: u32) -> BoneGameResult<()> {
    store.set(key, &score.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("poke_a_bone_{name}_{}.toml", std::process::id()))
    }

    /// Store whose backend always refuses access.
    struct DeniedStore;

    impl KeyValueStore for DeniedStore {
        fn get(&self, _key: &str) -> BoneGameResult<Option<String>> {
            Err(BoneGameError::StorageUnavailable("denied".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> BoneGameResult<()> {
            Err(BoneGameError::StorageUnavailable("denied".into()))
        }
    }

    #[test]
    fn reads_base_ten_high_score() {
        let store = MemoryStore::with_value("highScore", "1234");
        assert_eq!(load_high_score(&store, "highScore"), 1234);
        assert_eq!(load_high_score(&store, "otherKey"), 0);
    }

    #[test]
    fn malformed_or_denied_storage_reads_as_zero() {
        let store = MemoryStore::with_value("highScore", "lots");
        assert_eq!(load_high_score(&store, "highScore"), 0);
        assert_eq!(load_high_score(&DeniedStore, "highScore"), 0);
        assert!(save_high_score(&mut DeniedStore, "highScore", 10).is_err());
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let path = temp_path("round_trip");
        let _ = std::fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("highScore").unwrap(), None);

        save_high_score(&mut store, "highScore", 1800).unwrap();
        store.set("other", "value").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(load_high_score(&reopened, "highScore"), 1800);
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_file_is_reported_as_parse_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("highScore"), Err(BoneGameError::ConfigParse(_))));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn saving_over_a_corrupt_file_replaces_it() {
        let path = temp_path("overwrite");
        std::fs::write(&path, "highScore = = garbage").unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(load_high_score(&store, "highScore"), 0);
        save_high_score(&mut store, "highScore", 1800).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(load_high_score(&reopened, "highScore"), 1800);

        std::fs::remove_file(&path).unwrap();
    }
}
