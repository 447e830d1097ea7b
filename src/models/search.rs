use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::models::Id;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Документ из внешнего поиска (витрина и sitemap).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchDocument {
	pub id: Id,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub title: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct SearchQuery<'a> {
	pub text: &'a str,
	pub page: u32,
	pub page_size: u32,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub doc_type: Option<&'a str>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_encodes_spaces_and_skips_missing_type() {
		let query = SearchQuery {
			text: "ingliz tili",
			page: 1,
			page_size: 23,
			doc_type: None,
		};
		assert_eq!(
			serde_urlencoded::to_string(&query).unwrap(),
			"text=ingliz+tili&page=1&page_size=23"
		);
	}

	#[test]
	fn ids_may_be_numbers_or_strings() {
		let docs: Vec<SearchDocument> =
			serde_json::from_str(r#"[{"id":7,"title":"a"},{"id":"x-1","title":"b","views":3}]"#)
				.unwrap();
		assert_eq!(docs[0].id, Id::Int(7));
		assert_eq!(docs[1].id.to_string(), "x-1");
		assert_eq!(docs[1].extra.get("views"), Some(&Value::from(3)));
	}

	#[test]
	fn null_title_and_float_id_still_decode() {
		let docs: Vec<SearchDocument> =
			serde_json::from_str(r#"[{"id":1,"title":null},{"id":2.0},{"id":3,"title":"x"}]"#)
				.unwrap();
		assert_eq!(docs[0].title, "");
		assert_eq!(docs[1].id, Id::Int(2));
		assert_eq!(docs[2].title, "x");
	}
}
