use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::opt_id_string;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
	Click,
	Payme,
	Uzum,
}

impl PaymentProvider {
	pub const ALL: [PaymentProvider; 3] = [
		PaymentProvider::Click,
		PaymentProvider::Payme,
		PaymentProvider::Uzum,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			PaymentProvider::Click => "click",
			PaymentProvider::Payme => "payme",
			PaymentProvider::Uzum => "uzum",
		}
	}
}

impl FromStr for PaymentProvider {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		PaymentProvider::ALL
			.into_iter()
			.find(|p| p.as_str() == s.trim().to_lowercase())
			.ok_or_else(|| format!("Noma'lum to'lov tizimi: {}", s))
	}
}

#[derive(Debug, Serialize, Clone)]
pub struct CreatePaymentRequest<'a> {
	pub token: &'a str,
	pub amount: i64,
	pub paysystem: PaymentProvider,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentLink {
	#[serde(rename = "checkoutUrl", default)]
	pub checkout_url: Option<String>,
	#[serde(rename = "payId", default, deserialize_with = "opt_id_string")]
	pub pay_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
	Pending,
	Succeeded,
	Failed,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentStatusResponse {
	pub status: String,
	#[serde(default)]
	pub message: Option<String>,
}

impl PaymentStatusResponse {
	pub fn payment_status(&self) -> PaymentStatus {
		match self.status.as_str() {
			"succeed" | "succeeded" | "success" => PaymentStatus::Succeeded,
			"failed" | "cancelled" | "canceled" => PaymentStatus::Failed,
			_ => PaymentStatus::Pending,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSession {
	pub amount: i64,
	pub provider: PaymentProvider,
	pub pay_id: String,
	pub checkout_url: String,
	pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn provider_from_str_is_case_insensitive() {
		assert_eq!("Payme".parse::<PaymentProvider>(), Ok(PaymentProvider::Payme));
		assert!("paypal".parse::<PaymentProvider>().is_err());
	}

	#[test]
	fn numeric_pay_id_is_accepted() {
		let link: PaymentLink =
			serde_json::from_str(r#"{"checkoutUrl":"https://pay/x","payId":1234}"#).unwrap();
		assert_eq!(link.pay_id.as_deref(), Some("1234"));
	}

	#[test]
	fn status_mapping() {
		let status = |s: &str| PaymentStatusResponse {
			status: s.into(),
			message: None,
		}
		.payment_status();
		assert_eq!(status("succeed"), PaymentStatus::Succeeded);
		assert_eq!(status("pending"), PaymentStatus::Pending);
		assert_eq!(status("cancelled"), PaymentStatus::Failed);
	}
}
