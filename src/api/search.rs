use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::api::client::{decode_body, map_error_response, map_transport_error};
use crate::error::ApiError;
use crate::models::{SearchDocument, SearchQuery};

/// Внешний поиск по опубликованным документам.
#[async_trait]
pub trait SearchSource: Send + Sync {
	async fn search(
		&self,
		text: &str,
		page: u32,
		page_size: u32,
		doc_type: Option<&str>,
	) -> Result<Vec<SearchDocument>, ApiError>;
}

/// Разбирает выдачу поиска построчно: битая запись пропускается, остальные остаются.
pub fn decode_search_results(body: &str) -> Result<Vec<SearchDocument>, ApiError> {
	let rows: Vec<Value> = decode_body(body)?;
	let mut docs = Vec::with_capacity(rows.len());
	for row in rows {
		match serde_json::from_value::<SearchDocument>(row) {
			Ok(doc) => docs.push(doc),
			Err(e) => warn!("Пропускаем запись поиска: {}", e),
		}
	}
	Ok(docs)
}

#[derive(Debug, Clone)]
pub struct SearchClient {
	http: Client,
	base_url: String,
}

impl SearchClient {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			http: Client::new(),
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}

	pub fn search_url(&self, query: &SearchQuery<'_>) -> Result<String, ApiError> {
		let params =
			serde_urlencoded::to_string(query).map_err(|e| ApiError::Validation(e.to_string()))?;
		Ok(format!("{}/search?{}", self.base_url, params))
	}
}

#[async_trait]
impl SearchSource for SearchClient {
	async fn search(
		&self,
		text: &str,
		page: u32,
		page_size: u32,
		doc_type: Option<&str>,
	) -> Result<Vec<SearchDocument>, ApiError> {
		let url = self.search_url(&SearchQuery {
			text,
			page,
			page_size,
			doc_type,
		})?;
		debug!("GET {}", url);

		let response = self.http.get(&url).send().await.map_err(map_transport_error)?;
		let status = response.status().as_u16();
		let body = response.text().await.map_err(map_transport_error)?;
		if !(200..300).contains(&status) {
			return Err(map_error_response(status, &body));
		}
		decode_search_results(&body)
	}
}
