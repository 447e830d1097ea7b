use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::validate_payment;
use crate::models::{
	PaymentLink, PaymentProvider, PaymentSession, PaymentStatus, PaymentStatusResponse,
};
use crate::services::{
	poll_until, ErrorPolicy, GuardState, OnceGuard, PollOutcome, PollSchedule, PollStep, Session,
};

pub const PAYMENT_LINK_MISSING_MESSAGE: &str = "To'lov havolasi kelmadi.";
pub const PAYMENT_SUCCESS_MESSAGE: &str = "To'lov muvaffaqiyatli!";
pub const PAYMENT_FAILED_MESSAGE: &str = "To'lov amalga oshmadi.";

/// Платежные эндпоинты backend.
#[async_trait]
pub trait PaymentBackend: Send + Sync {
	async fn create_payment_link(
		&self,
		token: &str,
		amount: i64,
		provider: PaymentProvider,
	) -> Result<PaymentLink, ApiError>;

	async fn check_payment_status(
		&self,
		payment_id: &str,
		token: &str,
	) -> Result<PaymentStatusResponse, ApiError>;
}

#[async_trait]
impl PaymentBackend for ApiClient {
	async fn create_payment_link(
		&self,
		token: &str,
		amount: i64,
		provider: PaymentProvider,
	) -> Result<PaymentLink, ApiError> {
		ApiClient::create_payment_link(self, token, amount, provider).await
	}

	async fn check_payment_status(
		&self,
		payment_id: &str,
		token: &str,
	) -> Result<PaymentStatusResponse, ApiError> {
		ApiClient::check_payment_status(self, payment_id, token).await
	}
}

/// Проверяет сумму и провайдера и создает ссылку на оплату.
pub async fn start_payment(
	api: &dyn PaymentBackend,
	session: &Session,
	amount: &str,
	provider: &str,
) -> Result<PaymentSession, ApiError> {
	let (amount, provider) = validate_payment(amount, provider)?;
	let token = session.require_token()?;

	let link = api.create_payment_link(token, amount, provider).await?;
	match (link.checkout_url, link.pay_id) {
		(Some(checkout_url), Some(pay_id)) if !checkout_url.is_empty() => {
			info!("payment {} created via {}", pay_id, provider.as_str());
			Ok(PaymentSession {
				amount,
				provider,
				pay_id,
				checkout_url,
				status: PaymentStatus::Pending,
			})
		}
		_ => Err(ApiError::Validation(PAYMENT_LINK_MISSING_MESSAGE.to_string())),
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
	Succeeded(String),
	Failed(String),
	Cancelled,
	AlreadyRunning,
	AlreadyFinished,
}

enum PaymentTerminal {
	Succeeded(String),
	Failed(String),
}

async fn check_payment(
	source: Arc<dyn PaymentBackend>,
	pay_id: String,
	token: String,
) -> Result<PollStep<PaymentTerminal>, ApiError> {
	let response = source.check_payment_status(&pay_id, &token).await?;
	Ok(match response.payment_status() {
		PaymentStatus::Succeeded => PollStep::Done(PaymentTerminal::Succeeded(
			response
				.message
				.unwrap_or_else(|| PAYMENT_SUCCESS_MESSAGE.to_string()),
		)),
		PaymentStatus::Failed => PollStep::Done(PaymentTerminal::Failed(
			response
				.message
				.unwrap_or_else(|| PAYMENT_FAILED_MESSAGE.to_string()),
		)),
		PaymentStatus::Pending => PollStep::Pending,
	})
}

/// Ждет подтверждения оплаты с фиксированным интервалом. Ошибки проверки
/// не прерывают ожидание.
#[derive(Clone)]
pub struct PaymentWatcher {
	source: Arc<dyn PaymentBackend>,
	guard: OnceGuard,
	schedule: PollSchedule,
}

impl PaymentWatcher {
	pub fn new(source: Arc<dyn PaymentBackend>, schedule: PollSchedule) -> Self {
		Self {
			source,
			guard: OnceGuard::new(),
			schedule,
		}
	}

	pub async fn wait(
		&self,
		payment: &mut PaymentSession,
		session: &mut Session,
		cancel: &CancellationToken,
	) -> Result<PaymentOutcome, ApiError> {
		let token = session.require_token()?.to_string();
		let ticket = match self.guard.try_start(&payment.pay_id) {
			Ok(ticket) => ticket,
			Err(GuardState::Done) => return Ok(PaymentOutcome::AlreadyFinished),
			Err(_) => return Ok(PaymentOutcome::AlreadyRunning),
		};

		info!("waiting for payment {}", payment.pay_id);
		let outcome = poll_until(self.schedule, cancel, ErrorPolicy::Continue, |_| {
			check_payment(self.source.clone(), payment.pay_id.clone(), token.clone())
		})
		.await?;

		match outcome {
			PollOutcome::Cancelled => Ok(PaymentOutcome::Cancelled),
			PollOutcome::Finished(PaymentTerminal::Failed(message)) => {
				ticket.finish();
				payment.status = PaymentStatus::Failed;
				warn!("payment {} failed: {}", payment.pay_id, message);
				Ok(PaymentOutcome::Failed(message))
			}
			PollOutcome::Finished(PaymentTerminal::Succeeded(message)) => {
				ticket.finish();
				payment.status = PaymentStatus::Succeeded;
				info!("payment {} succeeded", payment.pay_id);
				if let Err(e) = session.refresh().await {
					warn!("balance refresh after payment failed: {}", e);
				}
				Ok(PaymentOutcome::Succeeded(message))
			}
		}
	}
}
