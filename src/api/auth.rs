use log::info;
use serde_json::Value;
use urlencoding::encode;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{UpdateNameRequest, User};

impl ApiClient {
	/// GET пользователь по одноразовому коду из бота
	pub async fn login(&self, code: &str) -> Result<User, ApiError> {
		info!("login attempt");
		self.get_json(&format!("/login/{}", encode(code.trim()))).await
	}

	pub async fn get_me(&self, token: &str) -> Result<User, ApiError> {
		self.get_json(&format!("/get-me?token={}", encode(token))).await
	}

	pub async fn update_name(&self, token: &str, new_full_name: &str) -> Result<(), ApiError> {
		let _: Value = self
			.post_json(
				"/update-name",
				&UpdateNameRequest {
					token,
					new_full_name,
				},
			)
			.await?;
		Ok(())
	}
}
