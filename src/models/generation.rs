use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{opt_id_string, Difficulty, DocType};

/// Задача на сборку файла, которую вернул `create_file`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GenerationTask {
	pub task_id: String,
	pub doc_title: String,
	pub doc_type: DocType,
}

#[derive(Debug, Serialize, Clone)]
pub struct PresentationRequest {
	pub token: String,
	pub topic: String,
	pub lang: String,
	pub slides_count: u32,
	pub with_image: bool,
	pub sources: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct DocumentRequest {
	pub token: String,
	pub topic: String,
	pub lang: String,
	pub slides_count: u32,
	pub sources: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct TestRequest {
	pub token: String,
	pub topic: String,
	pub lang: String,
	pub question_count: u32,
	pub difficulty: Difficulty,
	pub sources: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CrosswordRequest {
	pub token: String,
	pub topic: String,
	pub lang: String,
	pub word_count: u32,
	pub difficulty: Difficulty,
}

#[derive(Debug, Serialize, Clone)]
pub struct RegenerateSlideRequest {
	pub token: String,
	pub main_topic: String,
	pub slide_topic: String,
	pub lang: String,
	pub sources: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegenerateSlideResponse {
	pub new_content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct InstitutionInfo {
	pub university: String,
	pub faculty: String,
	pub direction: String,
	pub group: String,
}

impl InstitutionInfo {
	/// Непустые поля через запятую, как на титульном слайде.
	pub fn joined(&self) -> String {
		[&self.university, &self.faculty, &self.direction, &self.group]
			.iter()
			.map(|s| s.trim())
			.filter(|s| !s.is_empty())
			.collect::<Vec<_>>()
			.join(", ")
	}
}

#[derive(Debug, Serialize, Clone)]
pub struct CreateFileRequest {
	pub token: String,
	pub generated_content_data: Value,
	pub full_name: String,
	pub topic: String,
	pub doc_lang: String,
	pub institution_info: InstitutionInfo,
	pub template_name: String,
	pub file_type: String,
	pub sources: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CreateFileResponse {
	#[serde(default, deserialize_with = "opt_id_string")]
	pub task_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
	Completed,
	Failed,
	Running(String),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileStatusResponse {
	pub status: String,
	#[serde(default)]
	pub file_path: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
}

impl FileStatusResponse {
	pub fn state(&self) -> FileState {
		match self.status.as_str() {
			"completed" => FileState::Completed,
			"failed" => FileState::Failed,
			other => FileState::Running(other.to_string()),
		}
	}
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourceUploadResponse {
	pub file_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImageUploadResponse {
	pub image_url: String,
}

/// Ответ `get_image_url`: старый backend отдает одну ссылку, новый список.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImageUrlResponse {
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub image_urls: Vec<String>,
}

impl ImageUrlResponse {
	pub fn into_pool(self) -> Vec<String> {
		let mut pool = self.image_urls;
		if let Some(url) = self.image_url {
			if !url.is_empty() && !pool.contains(&url) {
				pool.insert(0, url);
			}
		}
		pool
	}
}
