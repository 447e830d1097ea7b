use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Тип документа, который заказывает пользователь.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocType {
	#[default]
	#[serde(rename = "Taqdimot")]
	Presentation,
	#[serde(rename = "Referat")]
	Abstract,
	#[serde(rename = "Test")]
	Test,
	#[serde(rename = "Krossvord")]
	Crossword,
}

impl DocType {
	pub fn label(&self) -> &'static str {
		match self {
			DocType::Presentation => "Taqdimot",
			DocType::Abstract => "Referat",
			DocType::Test => "Test",
			DocType::Crossword => "Krossvord",
		}
	}

	pub fn file_type(&self) -> FileType {
		match self {
			DocType::Presentation => FileType::Pptx,
			_ => FileType::Docx,
		}
	}
}

impl fmt::Display for DocType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

impl FromStr for DocType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		[
			DocType::Presentation,
			DocType::Abstract,
			DocType::Test,
			DocType::Crossword,
		]
		.into_iter()
		.find(|t| t.label().eq_ignore_ascii_case(s.trim()))
		.ok_or_else(|| format!("Noma'lum hujjat turi: {}", s))
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
	#[default]
	Pptx,
	Docx,
}

impl FileType {
	pub fn as_str(&self) -> &'static str {
		match self {
			FileType::Pptx => "pptx",
			FileType::Docx => "docx",
		}
	}
}

/// Запись в локальном списке документов пользователя.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Document {
	pub title: String,
	pub date: String,
	#[serde(rename = "downloadUrl", default)]
	pub download_url: String,
	#[serde(rename = "docType", default)]
	pub doc_type: DocType,
	#[serde(rename = "fileType", default)]
	pub file_type: FileType,
}

impl Document {
	/// Два документа считаются одинаковыми при совпадении (title, date, downloadUrl).
	pub fn same_as(&self, other: &Document) -> bool {
		self.title == other.title
			&& self.date == other.date
			&& self.download_url == other.download_url
	}
}
