use log::{debug, error};
use reqwest::{
	header::{self, HeaderMap, HeaderName, HeaderValue},
	Client, RequestBuilder,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{ApiError, INSUFFICIENT_BALANCE_MESSAGE};

/// Без этого заголовка туннель перед backend отдает HTML-заглушку.
pub const BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

/// Клиент backend. Дешево клонируется: внутри один `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ApiClient {
	http: Client,
	base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	detail: Option<serde_json::Value>,
}

impl ApiClient {
	pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
		let headers: HeaderMap<HeaderValue> = HeaderMap::from_iter(vec![(
			HeaderName::from_static(BYPASS_HEADER),
			HeaderValue::from_static("true"),
		)]);

		let http = Client::builder()
			.default_headers(headers)
			.build()
			.map_err(|e| ApiError::Validation(format!("HTTP client error: {}", e)))?;

		Ok(Self {
			http,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub(crate) fn http(&self) -> &Client {
		&self.http
	}

	pub(crate) fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		debug!("GET {}", path);
		self.send(self.http.get(self.url(path))).await
	}

	pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		debug!("POST {}", path);
		self.send(self.http.post(self.url(path)).json(body)).await
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
		let response = request
			.header(header::CONTENT_TYPE, "application/json")
			.send()
			.await
			.map_err(map_transport_error)?;

		let status = response.status().as_u16();
		let body = response.text().await.map_err(map_transport_error)?;

		if !(200..300).contains(&status) {
			return Err(map_error_response(status, &body));
		}

		decode_body(&body)
	}
}

/// Разбирает тело успешного ответа; пустое тело читается как `{}`.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
	let body = if body.trim().is_empty() { "{}" } else { body };
	serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Ошибка из тела неуспешного ответа.
pub fn map_error_response(status: u16, body: &str) -> ApiError {
	let detail = extract_detail(body);

	if status == 402 {
		return ApiError::InsufficientBalance(
			detail.unwrap_or_else(|| INSUFFICIENT_BALANCE_MESSAGE.to_string()),
		);
	}

	match detail {
		Some(message) => ApiError::Server { status, message },
		None => {
			error!("Serverdan kutilmagan javob (status {}): {}", status, body);
			ApiError::UnexpectedResponse { status }
		}
	}
}

/// Ошибка загрузки файла: `detail` из JSON или общий текст.
pub fn map_upload_response(status: u16, body: &str, fallback: &str) -> ApiError {
	ApiError::Upload(extract_detail(body).unwrap_or_else(|| {
		debug!("upload failed with status {}", status);
		fallback.to_string()
	}))
}

fn extract_detail(body: &str) -> Option<String> {
	let parsed: ErrorBody = serde_json::from_str(body).ok()?;
	match parsed.detail? {
		serde_json::Value::String(s) if !s.is_empty() => Some(s),
		serde_json::Value::Null => None,
		serde_json::Value::String(_) => None,
		other => Some(other.to_string()),
	}
}

pub(crate) fn map_transport_error(e: reqwest::Error) -> ApiError {
	if e.is_decode() {
		return ApiError::Decode(e.to_string());
	}
	error!("Network request failed: {}", e);
	ApiError::Network
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::Value;

	#[test]
	fn payment_required_uses_detail() {
		let err = map_error_response(402, r#"{"detail":"Balansingiz yetarli emas"}"#);
		assert!(err.is_insufficient_balance());
		assert_eq!(err.to_string(), "Balansingiz yetarli emas");
		assert_eq!(err.status(), Some(402));
	}

	#[test]
	fn payment_required_without_json_still_maps_to_balance() {
		let err = map_error_response(402, "<html>payment</html>");
		assert!(err.is_insufficient_balance());
		assert_eq!(err.to_string(), INSUFFICIENT_BALANCE_MESSAGE);
	}

	#[test]
	fn server_error_with_detail() {
		let err = map_error_response(400, r#"{"detail":"Kod xato"}"#);
		assert!(matches!(&err, ApiError::Server { status: 400, message } if message == "Kod xato"));
		assert_eq!(err.to_string(), "Kod xato");
	}

	#[test]
	fn non_json_error_is_generic_with_status() {
		let err = map_error_response(502, "Bad gateway");
		assert!(matches!(err, ApiError::UnexpectedResponse { status: 502 }));
		assert!(err.to_string().contains("502"));
	}

	#[test]
	fn json_without_detail_is_generic() {
		let err = map_error_response(500, r#"{"error":"boom"}"#);
		assert!(matches!(err, ApiError::UnexpectedResponse { status: 500 }));
	}

	#[test]
	fn structured_detail_is_stringified() {
		let err = map_error_response(422, r#"{"detail":[{"loc":["body","token"]}]}"#);
		assert!(matches!(err, ApiError::Server { status: 422, .. }));
		assert!(err.to_string().contains("token"));
	}

	#[test]
	fn empty_success_body_decodes_as_object() {
		let value: Value = decode_body("").unwrap();
		assert_eq!(value, serde_json::json!({}));
	}

	#[test]
	fn upload_errors() {
		let err = map_upload_response(413, r#"{"detail":"Fayl juda katta"}"#, "Could not upload file");
		assert_eq!(err.to_string(), "Fayl juda katta");
		let err = map_upload_response(500, "oops", "Could not upload file");
		assert_eq!(err.to_string(), "Could not upload file");
	}

	#[test]
	fn base_url_is_normalised() {
		let client = ApiClient::new("https://api.example.uz/").unwrap();
		assert_eq!(client.base_url(), "https://api.example.uz");
		assert_eq!(client.url("/get-me"), "https://api.example.uz/get-me");
	}
}
