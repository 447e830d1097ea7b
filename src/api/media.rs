use futures::stream::{self, StreamExt};
use log::{debug, info};
use reqwest::{multipart, Body};
use serde::de::DeserializeOwned;
use urlencoding::encode;

use crate::api::client::{decode_body, map_upload_response};
use crate::api::ApiClient;
use crate::error::{ApiError, UPLOAD_FAILED_MESSAGE, UPLOAD_NETWORK_MESSAGE};
use crate::models::{ImageUploadResponse, ImageUrlResponse, SourceUploadResponse};

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;
const IMAGE_UPLOAD_FAILED_MESSAGE: &str = "Rasm yuklashda xatolik";
const IMAGE_NETWORK_MESSAGE: &str = "Tarmoq xatoligi";

/// Процент отправленного тела, 0..=100.
pub fn upload_percent(sent: usize, total: usize) -> f64 {
	if total == 0 {
		return 100.0;
	}
	(sent as f64 / total as f64) * 100.0
}

fn progress_part<F>(
	bytes: Vec<u8>,
	filename: &str,
	mime: &str,
	on_progress: F,
) -> Result<multipart::Part, ApiError>
where
	F: Fn(f64) + Send + Sync + 'static,
{
	let total = bytes.len();
	let chunks: Vec<Vec<u8>> = bytes
		.chunks(UPLOAD_CHUNK_SIZE)
		.map(|chunk| chunk.to_vec())
		.collect();

	let mut sent = 0usize;
	let body_stream = stream::iter(chunks).map(move |chunk| {
		sent += chunk.len();
		on_progress(upload_percent(sent, total));
		Ok::<Vec<u8>, std::io::Error>(chunk)
	});

	multipart::Part::stream_with_length(Body::wrap_stream(body_stream), total as u64)
		.file_name(filename.to_string())
		.mime_str(mime)
		.map_err(|e| ApiError::Upload(e.to_string()))
}

impl ApiClient {
	/// Загружает PDF-источник и сообщает прогресс в процентах.
	pub async fn upload_source<F>(
		&self,
		bytes: Vec<u8>,
		filename: &str,
		on_progress: F,
	) -> Result<SourceUploadResponse, ApiError>
	where
		F: Fn(f64) + Send + Sync + 'static,
	{
		info!("uploading source {} ({} bytes)", filename, bytes.len());
		let part = progress_part(bytes, filename, "application/pdf", on_progress)?;
		self.send_multipart(
			"/upload_source",
			multipart::Form::new().part("file", part),
			UPLOAD_FAILED_MESSAGE,
			UPLOAD_NETWORK_MESSAGE,
		)
		.await
	}

	pub async fn upload_image(
		&self,
		bytes: Vec<u8>,
		filename: &str,
		mime: &str,
	) -> Result<ImageUploadResponse, ApiError> {
		info!("uploading image {} ({} bytes)", filename, bytes.len());
		let part = multipart::Part::bytes(bytes)
			.file_name(filename.to_string())
			.mime_str(mime)
			.map_err(|e| ApiError::Upload(e.to_string()))?;
		self.send_multipart(
			"/upload_image",
			multipart::Form::new().part("file", part),
			IMAGE_UPLOAD_FAILED_MESSAGE,
			IMAGE_NETWORK_MESSAGE,
		)
		.await
	}

	/// Пул картинок по теме.
	pub async fn get_image_url(&self, topic: &str) -> Result<Vec<String>, ApiError> {
		let response: ImageUrlResponse = self
			.get_json(&format!("/get_image_url?topic={}", encode(topic)))
			.await?;
		Ok(response.into_pool())
	}

	async fn send_multipart<T: DeserializeOwned>(
		&self,
		path: &str,
		form: multipart::Form,
		failure: &str,
		network_failure: &str,
	) -> Result<T, ApiError> {
		debug!("POST multipart {}", path);
		let response = self
			.http()
			.post(self.url(path))
			.multipart(form)
			.send()
			.await
			.map_err(|_| ApiError::Upload(network_failure.to_string()))?;

		let status = response.status().as_u16();
		let body = response
			.text()
			.await
			.map_err(|_| ApiError::Upload(network_failure.to_string()))?;

		if status != 200 {
			return Err(map_upload_response(status, &body, failure));
		}
		decode_body(&body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn percent_of_uploaded_bytes() {
		assert_eq!(upload_percent(0, 200), 0.0);
		assert_eq!(upload_percent(50, 200), 25.0);
		assert_eq!(upload_percent(200, 200), 100.0);
		assert_eq!(upload_percent(0, 0), 100.0);
	}
}
