use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::validate_login_code;
use crate::models::User;
use crate::storage::SessionStore;

pub const NOT_LOGGED_IN_MESSAGE: &str = "Avval tizimga kiring.";

/// Операции backend, от которых зависит сессия.
#[async_trait]
pub trait ProfileSource: Send + Sync {
	async fn login(&self, code: &str) -> Result<User, ApiError>;
	async fn get_me(&self, token: &str) -> Result<User, ApiError>;
	async fn update_name(&self, token: &str, new_full_name: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl ProfileSource for ApiClient {
	async fn login(&self, code: &str) -> Result<User, ApiError> {
		ApiClient::login(self, code).await
	}

	async fn get_me(&self, token: &str) -> Result<User, ApiError> {
		ApiClient::get_me(self, token).await
	}

	async fn update_name(&self, token: &str, new_full_name: &str) -> Result<(), ApiError> {
		ApiClient::update_name(self, token, new_full_name).await
	}
}

/// Текущий пользователь и его токен. Передается в экраны явно.
pub struct Session {
	profile: Arc<dyn ProfileSource>,
	store: SessionStore,
	user: Option<User>,
	token: Option<String>,
}

impl Session {
	pub fn new(profile: Arc<dyn ProfileSource>, store: SessionStore) -> Self {
		Self {
			profile,
			store,
			user: None,
			token: None,
		}
	}

	pub fn is_logged_in(&self) -> bool {
		self.user.is_some() && self.token.is_some()
	}

	pub fn user(&self) -> Option<&User> {
		self.user.as_ref()
	}

	pub fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	pub fn store(&self) -> &SessionStore {
		&self.store
	}

	pub fn require_token(&self) -> Result<&str, ApiError> {
		self.token()
			.ok_or_else(|| ApiError::Validation(NOT_LOGGED_IN_MESSAGE.to_string()))
	}

	/// Проверяет сохраненный токен. Невалидный токен стирается.
	pub async fn restore(&mut self) -> Result<bool, ApiError> {
		info!("[Auth] checking saved token");
		let Some(token) = self.store.token()? else {
			info!("[Auth] no saved token");
			return Ok(false);
		};

		match self.profile.get_me(&token).await {
			Ok(user) => {
				info!("[Auth] token valid, user {}", user.chat_id);
				self.user = Some(user);
				self.token = Some(token);
				Ok(true)
			}
			Err(e) => {
				warn!("[Auth] saved token rejected: {}", e);
				self.logout()?;
				Ok(false)
			}
		}
	}

	pub async fn login(&mut self, code: &str) -> Result<&User, ApiError> {
		validate_login_code(code)?;
		let user = self.profile.login(code.trim()).await?;
		let token = user
			.token
			.clone()
			.filter(|t| !t.is_empty())
			.ok_or(ApiError::MissingField("token"))?;

		self.store.set_token(&token)?;
		info!("[Auth] logged in as {}", user.chat_id);
		self.token = Some(token);
		let user: &User = self.user.insert(user);
		Ok(user)
	}

	pub fn logout(&mut self) -> Result<(), ApiError> {
		info!("[Auth] logging out");
		self.user = None;
		self.token = None;
		self.store.clear()?;
		Ok(())
	}

	/// Перечитывает профиль (например, баланс после оплаты). При ошибке
	/// сессия закрывается.
	pub async fn refresh(&mut self) -> Result<(), ApiError> {
		let Some(token) = self.store.token()? else {
			return Ok(());
		};
		match self.profile.get_me(&token).await {
			Ok(user) => {
				info!("[Auth] profile refreshed, balance {}", user.balance);
				self.user = Some(user);
				self.token = Some(token);
				Ok(())
			}
			Err(e) => {
				warn!("[Auth] profile refresh failed: {}", e);
				self.logout()?;
				Err(e)
			}
		}
	}

	/// `Ok(false)`, если имя пустое или не изменилось.
	pub async fn update_name(&mut self, name: &str) -> Result<bool, ApiError> {
		let name = name.trim();
		let token = self.require_token()?.to_string();
		let current = self.user.as_ref().map(|u| u.full_name.as_str());
		if name.is_empty() || current == Some(name) {
			return Ok(false);
		}

		self.profile.update_name(&token, name).await?;
		if let Some(user) = self.user.as_mut() {
			user.full_name = name.to_string();
		}
		Ok(true)
	}

	pub fn set_avatar(&self, bytes: &[u8], mime: &str) -> Result<String, ApiError> {
		Ok(self.store.set_avatar(bytes, mime)?)
	}
}
