use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::KeyValueStore;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_AVATAR_KEY: &str = "userAvatar";
pub const DEFAULT_AVATAR: &str = "/images/avatar.jpg";

/// Токен сессии и аватар пользователя.
#[derive(Clone)]
pub struct SessionStore {
	store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self { store }
	}

	pub fn token(&self) -> Result<Option<String>, StorageError> {
		Ok(self
			.store
			.get(AUTH_TOKEN_KEY)?
			.filter(|token| !token.is_empty()))
	}

	pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
		self.store.set(AUTH_TOKEN_KEY, token)
	}

	/// Сохраняет картинку как `data:` URL.
	pub fn set_avatar(&self, bytes: &[u8], mime: &str) -> Result<String, StorageError> {
		let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
		self.store.set(USER_AVATAR_KEY, &data_url)?;
		Ok(data_url)
	}

	pub fn avatar(&self) -> Result<String, StorageError> {
		Ok(self
			.store
			.get(USER_AVATAR_KEY)?
			.unwrap_or_else(|| DEFAULT_AVATAR.to_string()))
	}

	/// Сырые байты сохраненного аватара, если он есть и читается.
	pub fn avatar_bytes(&self) -> Result<Option<Vec<u8>>, StorageError> {
		let Some(data_url) = self.store.get(USER_AVATAR_KEY)? else {
			return Ok(None);
		};
		Ok(data_url
			.split_once(";base64,")
			.and_then(|(_, encoded)| STANDARD.decode(encoded).ok()))
	}

	pub fn clear(&self) -> Result<(), StorageError> {
		self.store.remove(AUTH_TOKEN_KEY)?;
		self.store.remove(USER_AVATAR_KEY)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::storage::MemoryStore;

	#[test]
	fn avatar_defaults_and_roundtrips() {
		let session = SessionStore::new(Arc::new(MemoryStore::new()));
		assert_eq!(session.avatar().unwrap(), DEFAULT_AVATAR);
		assert_eq!(session.avatar_bytes().unwrap(), None);

		let url = session.set_avatar(&[1, 2, 3], "image/png").unwrap();
		assert_eq!(url, "data:image/png;base64,AQID");
		assert_eq!(session.avatar().unwrap(), url);
		assert_eq!(session.avatar_bytes().unwrap(), Some(vec![1, 2, 3]));
	}

	#[test]
	fn clear_drops_token_and_avatar() {
		let session = SessionStore::new(Arc::new(MemoryStore::new()));
		session.set_token("tok").unwrap();
		session.set_avatar(b"x", "image/jpeg").unwrap();
		session.clear().unwrap();
		assert_eq!(session.token().unwrap(), None);
		assert_eq!(session.avatar().unwrap(), DEFAULT_AVATAR);
	}
}
