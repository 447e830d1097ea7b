use log::debug;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Строковое key-value хранилище (аналог localStorage).
pub trait KeyValueStore: Send + Sync {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
	fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
	fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.lock().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.entries.lock().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		self.entries.lock().remove(key);
		Ok(())
	}
}

/// Все ключи в одном JSON-объекте на диске; файл переписывается целиком
/// при каждом изменении.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
	pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
		let path = path.as_ref().to_path_buf();
		let entries = match fs::read_to_string(&path) {
			Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
			Ok(raw) => serde_json::from_str(&raw)?,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
			Err(e) => return Err(e.into()),
		};
		debug!("storage opened at {} ({} keys)", path.display(), entries.len());
		Ok(Self {
			path,
			entries: Mutex::new(entries),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}
		let tmp = self.path.with_extension("tmp");
		fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
		fs::rename(&tmp, &self.path)?;
		Ok(())
	}
}

impl KeyValueStore for FileStore {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.lock().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let mut entries = self.entries.lock();
		entries.insert(key.to_string(), value.to_string());
		self.flush(&entries)
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		let mut entries = self.entries.lock();
		if entries.remove(key).is_some() {
			self.flush(&entries)?;
		}
		Ok(())
	}
}
