use std::sync::Arc;

use crate::error::StorageError;
use crate::models::{Id, SearchDocument};
use crate::storage::KeyValueStore;

pub const DOC_DETAIL_PREFIX: &str = "docDetail_";

/// Карточки документов для прямых ссылок `/d/{id}`.
#[derive(Clone)]
pub struct DocumentDetailCache {
	store: Arc<dyn KeyValueStore>,
}

impl DocumentDetailCache {
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self { store }
	}

	pub fn put(&self, doc: &SearchDocument) -> Result<(), StorageError> {
		self.store.set(
			&format!("{}{}", DOC_DETAIL_PREFIX, doc.id),
			&serde_json::to_string(doc)?,
		)
	}

	pub fn get(&self, id: &Id) -> Result<Option<SearchDocument>, StorageError> {
		match self.store.get(&format!("{}{}", DOC_DETAIL_PREFIX, id))? {
			Some(raw) => Ok(serde_json::from_str(&raw).ok()),
			None => Ok(None),
		}
	}
}
