use urlencoding::encode;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{CreatePaymentRequest, PaymentLink, PaymentProvider, PaymentStatusResponse};

impl ApiClient {
	pub async fn create_payment_link(
		&self,
		token: &str,
		amount: i64,
		provider: PaymentProvider,
	) -> Result<PaymentLink, ApiError> {
		self.post_json(
			"/create_payment_link",
			&CreatePaymentRequest {
				token,
				amount,
				paysystem: provider,
			},
		)
		.await
	}

	pub async fn check_payment_status(
		&self,
		payment_id: &str,
		token: &str,
	) -> Result<PaymentStatusResponse, ApiError> {
		self.get_json(&format!(
			"/check_payment_status/{}?token={}",
			encode(payment_id),
			encode(token)
		))
		.await
	}
}
