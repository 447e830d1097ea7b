use log::{info, warn};
use std::sync::Arc;

use crate::error::StorageError;
use crate::models::Document;
use crate::storage::KeyValueStore;

pub const USER_DOCUMENTS_KEY: &str = "userDocuments";

/// Локальный список созданных документов, новые сверху.
pub struct DocumentList {
	store: Arc<dyn KeyValueStore>,
	docs: Vec<Document>,
}

impl DocumentList {
	pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
		let docs = match store.get(USER_DOCUMENTS_KEY)? {
			Some(raw) => serde_json::from_str::<Vec<Document>>(&raw).unwrap_or_else(|e| {
				warn!("saved documents are unreadable, starting empty: {}", e);
				Vec::new()
			}),
			None => Vec::new(),
		};
		Ok(Self { store, docs })
	}

	pub fn docs(&self) -> &[Document] {
		&self.docs
	}

	pub fn len(&self) -> usize {
		self.docs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.docs.is_empty()
	}

	/// Добавляет документ в начало. Возвращает `false`, если такой
	/// (title, date, downloadUrl) уже есть.
	pub fn add(&mut self, doc: Document) -> Result<bool, StorageError> {
		if self.docs.iter().any(|d| d.same_as(&doc)) {
			info!("document '{}' already listed", doc.title);
			return Ok(false);
		}
		let mut next = Vec::with_capacity(self.docs.len() + 1);
		next.push(doc);
		next.extend(self.docs.iter().cloned());
		self.persist(&next)?;
		self.docs = next;
		Ok(true)
	}

	pub fn delete(&mut self, index: usize) -> Result<Option<Document>, StorageError> {
		if index >= self.docs.len() {
			return Ok(None);
		}
		let mut next = self.docs.clone();
		let removed = next.remove(index);
		self.persist(&next)?;
		self.docs = next;
		info!("document #{} '{}' deleted", index, removed.title);
		Ok(Some(removed))
	}

	/// Поиск по названию без учета регистра.
	pub fn filter(&self, query: &str) -> Vec<&Document> {
		let query = query.trim().to_lowercase();
		self.docs
			.iter()
			.filter(|d| d.title.to_lowercase().contains(&query))
			.collect()
	}

	/// Список в памяти меняется только после успешной записи.
	fn persist(&self, docs: &[Document]) -> Result<(), StorageError> {
		let raw = serde_json::to_string(docs)?;
		self.store.set(USER_DOCUMENTS_KEY, &raw)
	}
}
