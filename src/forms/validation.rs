use std::str::FromStr;

use crate::error::ApiError;
use crate::models::PaymentProvider;

pub const LOGIN_CODE_LENGTH: usize = 6;
pub const MAX_SOURCE_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

pub const LOGIN_CODE_MESSAGE: &str = "Kod 6 xonali bo'lishi kerak.";
pub const SOURCE_TOO_LARGE_MESSAGE: &str = "Xatolik: Fayl hajmi 10MB dan katta bo'lmasligi kerak.";
pub const SOURCE_NOT_PDF_MESSAGE: &str = "Xatolik: Faqat PDF fayl yuklash mumkin.";
pub const IMAGE_TOO_LARGE_MESSAGE: &str = "Xatolik: Rasm hajmi 5MB dan katta bo'lmasligi kerak.";
pub const IMAGE_TYPE_MESSAGE: &str = "Xatolik: Faqat PNG yoki JPEG rasm yuklash mumkin.";
pub const INVALID_AMOUNT_MESSAGE: &str = "Iltimos, to'g'ri summa kiriting.";

pub fn validate_login_code(code: &str) -> Result<(), ApiError> {
	if code.trim().chars().count() != LOGIN_CODE_LENGTH {
		return Err(ApiError::Validation(LOGIN_CODE_MESSAGE.to_string()));
	}
	Ok(())
}

/// Источник принимается только в PDF и не больше 10 МБ.
pub fn validate_source_upload(filename: &str, mime: Option<&str>, size: u64) -> Result<(), ApiError> {
	let is_pdf = match mime {
		Some(mime) => mime.eq_ignore_ascii_case("application/pdf"),
		None => filename.to_lowercase().ends_with(".pdf"),
	};
	if !is_pdf {
		return Err(ApiError::Validation(SOURCE_NOT_PDF_MESSAGE.to_string()));
	}
	if size > MAX_SOURCE_BYTES {
		return Err(ApiError::Validation(SOURCE_TOO_LARGE_MESSAGE.to_string()));
	}
	Ok(())
}

pub fn validate_image_upload(mime: &str, size: u64) -> Result<(), ApiError> {
	if !matches!(mime, "image/png" | "image/jpeg" | "image/jpg") {
		return Err(ApiError::Validation(IMAGE_TYPE_MESSAGE.to_string()));
	}
	if size > MAX_IMAGE_BYTES {
		return Err(ApiError::Validation(IMAGE_TOO_LARGE_MESSAGE.to_string()));
	}
	Ok(())
}

/// Сумма из поля ввода и название платежной системы.
pub fn validate_payment(amount: &str, provider: &str) -> Result<(i64, PaymentProvider), ApiError> {
	let amount = amount
		.trim()
		.parse::<i64>()
		.ok()
		.filter(|a| *a > 0)
		.ok_or_else(|| ApiError::Validation(INVALID_AMOUNT_MESSAGE.to_string()))?;
	let provider = PaymentProvider::from_str(provider.trim()).map_err(ApiError::Validation)?;
	Ok((amount, provider))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn login_code_must_have_six_characters() {
		assert!(validate_login_code("123456").is_ok());
		assert!(validate_login_code(" 123456 ").is_ok());
		assert!(validate_login_code("12345").is_err());
		assert!(validate_login_code("1234567").is_err());
	}

	#[test]
	fn source_must_be_small_pdf() {
		assert!(validate_source_upload("a.pdf", Some("application/pdf"), MAX_SOURCE_BYTES).is_ok());
		assert!(validate_source_upload("A.PDF", None, 10).is_ok());

		let err = validate_source_upload("a.pdf", None, MAX_SOURCE_BYTES + 1).unwrap_err();
		assert_eq!(err.to_string(), SOURCE_TOO_LARGE_MESSAGE);
		let err = validate_source_upload("a.docx", None, 10).unwrap_err();
		assert_eq!(err.to_string(), SOURCE_NOT_PDF_MESSAGE);
	}

	#[test]
	fn image_limit_is_five_megabytes() {
		assert!(validate_image_upload("image/png", MAX_IMAGE_BYTES).is_ok());
		assert!(validate_image_upload("image/jpeg", MAX_IMAGE_BYTES + 1).is_err());
		assert!(validate_image_upload("image/gif", 10).is_err());
	}

	#[test]
	fn payment_amount_and_provider() {
		assert_eq!(
			validate_payment("15000", "payme").unwrap(),
			(15000, PaymentProvider::Payme)
		);
		for bad in ["0", "-5", "", "abc"] {
			let err = validate_payment(bad, "click").unwrap_err();
			assert_eq!(err.to_string(), INVALID_AMOUNT_MESSAGE);
		}
		assert!(validate_payment("1000", "paypal").is_err());
	}
}
