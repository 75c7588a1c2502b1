use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::error;

/// Durable key/value storage over a local data directory: one JSON file per
/// key. Reads degrade to `None` and writes never propagate failures; the
/// store treats persistence as always-succeeding.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

/// Data directory from `APP_DATA_DIR`, falling back to `data/`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("APP_DATA_DIR") {
        return PathBuf::from(dir);
    }

    PathBuf::from("data")
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The stored value for `key`, or `None` when absent or unreadable.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                None
            }
        }
    }

    /// Writes `value` under `key`. Failures are logged and swallowed.
    pub fn set(&self, key: &str, value: &str) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            error!("failed to create data dir {}: {err}", self.dir.display());
            return;
        }
        let path = self.path_for(key);
        if let Err(err) = fs::write(&path, value) {
            error!("failed to write {}: {err}", path.display());
        }
    }

    /// Deletes the value for `key` if present.
    pub fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                error!("failed to remove {}: {err}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_none_for_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        assert_eq!(storage.get("nothing_here"), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.set("some_key", "{\"a\":1}");
        assert_eq!(storage.get("some_key").as_deref(), Some("{\"a\":1}"));

        storage.set("some_key", "{\"a\":2}");
        assert_eq!(storage.get("some_key").as_deref(), Some("{\"a\":2}"));
    }

    #[test]
    fn set_creates_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("data");
        let storage = Storage::new(&nested);
        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn remove_deletes_the_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.set("gone", "1");
        storage.remove("gone");
        assert_eq!(storage.get("gone"), None);
        // removing again is a no-op
        storage.remove("gone");
    }
}
