use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct User {
	pub chat_id: i64,
	#[serde(default)]
	pub full_name: String,
	#[serde(default)]
	pub balance: i64,
	#[serde(default)]
	pub price_presentation: i64,
	#[serde(default)]
	pub price_presentation_with_images: i64,
	#[serde(default)]
	pub price_abstract: i64,
	#[serde(default)]
	pub price_test_per_question: i64,
	#[serde(default)]
	pub price_crossword_per_word: i64,
	#[serde(default)]
	pub price_with_source: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateNameRequest<'a> {
	pub token: &'a str,
	pub new_full_name: &'a str,
}
