//! File-backed [`KeyValueStore`] for the travel-time cache.
//!
//! Each key maps to one JSON file inside a cache directory, so the
//! persisted payload survives between invocations.

use std::fs;
use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use nestwise_core::{KeyValueStore, StoreError};

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Utf8PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] when the directory cannot be created.
    pub fn open(dir: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_owned();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io { source })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Utf8PathBuf {
        // Keys are dotted identifiers, safe as file names.
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { source }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path_for(key), value).map_err(|source| match source.kind() {
            ErrorKind::StorageFull => StoreError::QuotaExceeded {
                key: key.to_owned(),
            },
            _ => StoreError::Io { source },
        })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("should create temp dir")
    }

    fn store_in(dir: &TempDir) -> FileStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temp path should be UTF-8");
        FileStore::open(path).expect("should open store")
    }

    #[rstest]
    fn set_then_get_round_trips(temp_dir: TempDir) {
        let mut store = store_in(&temp_dir);
        store.set_item("nestwise.travel-cache", "{}").unwrap();
        assert_eq!(
            store.get_item("nestwise.travel-cache").unwrap(),
            Some("{}".to_owned())
        );
    }

    #[rstest]
    fn missing_key_reads_none(temp_dir: TempDir) {
        let store = store_in(&temp_dir);
        assert_eq!(store.get_item("absent").unwrap(), None);
    }

    #[rstest]
    fn remove_is_idempotent(temp_dir: TempDir) {
        let mut store = store_in(&temp_dir);
        store.set_item("k", "v").unwrap();
        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[rstest]
    fn values_survive_reopening(temp_dir: TempDir) {
        {
            let mut store = store_in(&temp_dir);
            store.set_item("k", "v").unwrap();
        }
        let store = store_in(&temp_dir);
        assert_eq!(store.get_item("k").unwrap(), Some("v".to_owned()));
    }
}
