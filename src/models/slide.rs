use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
	Easy,
	#[default]
	Medium,
	Hard,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TitleSlide {
	pub title: String,
	pub author: String,
	pub institution: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlanSlide {
	pub title: String,
	pub items: Vec<String>,
}

/// Слайд с текстом, как его отдает backend. Неизвестные поля сохраняются
/// и уходят обратно в `create_file` без изменений.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ContentSlide {
	pub title: String,
	#[serde(default)]
	pub content: Vec<String>,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestQuestion {
	pub question: String,
	pub options: Vec<String>,
	pub correct_answer: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestPayload {
	pub topic: String,
	#[serde(default)]
	pub difficulty: Difficulty,
	pub questions: Vec<TestQuestion>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
	#[serde(alias = "horizontal")]
	Across,
	#[serde(alias = "vertical")]
	Down,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CrosswordWord {
	pub word: String,
	pub clue: String,
	pub orientation: Orientation,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CrosswordPayload {
	pub topic: String,
	#[serde(default)]
	pub difficulty: Difficulty,
	pub words: Vec<CrosswordWord>,
}

/// Ответ `generate_presentation` / `generate_document`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct GeneratedContent {
	#[serde(default)]
	pub plans: Vec<String>,
	#[serde(default)]
	pub slides: Vec<ContentSlide>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Элемент редактора.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum EditableSlide {
	Title(TitleSlide),
	Plan(PlanSlide),
	Content(ContentSlide),
	Test(TestPayload),
	Crossword(CrosswordPayload),
}

impl EditableSlide {
	pub fn as_content(&self) -> Option<&ContentSlide> {
		match self {
			EditableSlide::Content(slide) => Some(slide),
			_ => None,
		}
	}

	pub fn as_content_mut(&mut self) -> Option<&mut ContentSlide> {
		match self {
			EditableSlide::Content(slide) => Some(slide),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn content_slide_keeps_unknown_fields() {
		let raw = json!({
			"title": "Kirish",
			"content": ["a", "b"],
			"image_url": null,
			"layout": "two-column"
		});
		let slide: ContentSlide = serde_json::from_value(raw).unwrap();
		assert_eq!(slide.content.len(), 2);
		assert_eq!(slide.extra.get("layout"), Some(&json!("two-column")));

		let back = serde_json::to_value(&slide).unwrap();
		assert_eq!(back["layout"], json!("two-column"));
	}

	#[test]
	fn editable_slide_is_tagged_by_type() {
		let slide = EditableSlide::Plan(PlanSlide {
			title: "Reja:".into(),
			items: vec!["Kirish".into()],
		});
		let value = serde_json::to_value(&slide).unwrap();
		assert_eq!(value["type"], json!("plan"));
		assert_eq!(value["content"]["items"][0], json!("Kirish"));
	}

	#[test]
	fn crossword_accepts_horizontal_alias() {
		let payload: CrosswordPayload = serde_json::from_value(json!({
			"topic": "Atom",
			"difficulty": "hard",
			"words": [{"word": "proton", "clue": "musbat zarra", "orientation": "horizontal"}]
		}))
		.unwrap();
		assert_eq!(payload.words[0].orientation, Orientation::Across);
		assert_eq!(payload.difficulty, Difficulty::Hard);
	}
}
