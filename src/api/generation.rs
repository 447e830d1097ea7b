use urlencoding::encode;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{
	CreateFileRequest, CreateFileResponse, CrosswordPayload, CrosswordRequest, DocumentRequest,
	FileStatusResponse, GeneratedContent, PresentationRequest, RegenerateSlideRequest,
	RegenerateSlideResponse, TestPayload, TestRequest,
};

impl ApiClient {
	pub async fn generate_presentation(
		&self,
		request: &PresentationRequest,
	) -> Result<GeneratedContent, ApiError> {
		self.post_json("/generate_presentation", request).await
	}

	/// Реферат: тот же формат ответа, что и у презентации.
	pub async fn generate_document(
		&self,
		request: &DocumentRequest,
	) -> Result<GeneratedContent, ApiError> {
		self.post_json("/generate_document", request).await
	}

	pub async fn generate_test(&self, request: &TestRequest) -> Result<TestPayload, ApiError> {
		self.post_json("/generate_test", request).await
	}

	pub async fn generate_crossword(
		&self,
		request: &CrosswordRequest,
	) -> Result<CrosswordPayload, ApiError> {
		self.post_json("/generate_crossword", request).await
	}

	pub async fn regenerate_slide_content(
		&self,
		request: &RegenerateSlideRequest,
	) -> Result<String, ApiError> {
		let response: RegenerateSlideResponse =
			self.post_json("/regenerate_slide_content", request).await?;
		Ok(response.new_content)
	}

	/// Ставит сборку файла в очередь и возвращает id задачи.
	pub async fn create_file(&self, request: &CreateFileRequest) -> Result<String, ApiError> {
		let response: CreateFileResponse = self.post_json("/create_file", request).await?;
		response.task_id.ok_or(ApiError::MissingField("task_id"))
	}

	pub async fn file_status(&self, task_id: &str) -> Result<FileStatusResponse, ApiError> {
		self.get_json(&format!("/file_status/{}", encode(task_id)))
			.await
	}

	/// Ссылка на скачивание готового файла; путь от backend вставляется как есть.
	pub fn download_url(&self, file_path: &str) -> String {
		self.url(&format!(
			"/download_file/{}",
			file_path.trim_start_matches('/')
		))
	}
}
