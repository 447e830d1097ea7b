use chrono::Duration;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use crate::utils::Clock;

pub const IMAGE_CACHE_PREFIX: &str = "imageCache_";
pub const IMAGE_CACHE_TTL_DAYS: i64 = 7;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImageCacheEntry {
	pub urls: Vec<String>,
	/// Миллисекунды с начала эпохи.
	pub timestamp: i64,
}

/// Пул картинок по теме. Просроченные записи удаляются при чтении.
#[derive(Clone)]
pub struct ImagePoolCache {
	store: Arc<dyn KeyValueStore>,
	clock: Arc<dyn Clock>,
	ttl: Duration,
}

pub fn image_cache_key(topic: &str) -> String {
	format!("{}{}", IMAGE_CACHE_PREFIX, topic.trim().to_lowercase())
}

impl ImagePoolCache {
	pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
		Self {
			store,
			clock,
			ttl: Duration::days(IMAGE_CACHE_TTL_DAYS),
		}
	}

	pub fn get(&self, topic: &str) -> Result<Option<Vec<String>>, StorageError> {
		let key = image_cache_key(topic);
		let Some(raw) = self.store.get(&key)? else {
			return Ok(None);
		};

		let entry: ImageCacheEntry = match serde_json::from_str(&raw) {
			Ok(entry) => entry,
			Err(e) => {
				warn!("dropping unreadable image cache entry {}: {}", key, e);
				self.store.remove(&key)?;
				return Ok(None);
			}
		};

		let age_ms = self.clock.now().timestamp_millis() - entry.timestamp;
		if age_ms > self.ttl.num_milliseconds() {
			debug!("image cache entry {} expired", key);
			self.store.remove(&key)?;
			return Ok(None);
		}
		Ok(Some(entry.urls))
	}

	pub fn put(&self, topic: &str, urls: &[String]) -> Result<(), StorageError> {
		let entry = ImageCacheEntry {
			urls: urls.to_vec(),
			timestamp: self.clock.now().timestamp_millis(),
		};
		self.store
			.set(&image_cache_key(topic), &serde_json::to_string(&entry)?)
	}

	pub fn remove(&self, topic: &str) -> Result<(), StorageError> {
		self.store.remove(&image_cache_key(topic))
	}
}
