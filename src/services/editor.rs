use async_trait::async_trait;
use log::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::{validate_image_upload, EditorSettings};
use crate::models::{
	ContentSlide, CreateFileRequest, CrosswordPayload, CrosswordRequest, DocType, DocumentRequest,
	EditableSlide, GeneratedContent, GenerationTask, ImageUploadResponse, PlanSlide,
	PresentationRequest, RegenerateSlideRequest, TestPayload, TestRequest, TitleSlide,
};
use crate::storage::ImagePoolCache;

pub const PLAN_TITLE: &str = "Reja:";
pub const SLIDE_NOT_FOUND_MESSAGE: &str = "Slayd topilmadi.";
pub const NO_NEW_IMAGE_MESSAGE: &str = "Yangi rasm topilmadi.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleField {
	Title,
	Author,
	Institution,
}

/// Эндпоинты backend, которые нужны редактору.
#[async_trait]
pub trait EditorBackend: Send + Sync {
	async fn generate_presentation(
		&self,
		request: &PresentationRequest,
	) -> Result<GeneratedContent, ApiError>;
	async fn generate_document(
		&self,
		request: &DocumentRequest,
	) -> Result<GeneratedContent, ApiError>;
	async fn generate_test(&self, request: &TestRequest) -> Result<TestPayload, ApiError>;
	async fn generate_crossword(
		&self,
		request: &CrosswordRequest,
	) -> Result<CrosswordPayload, ApiError>;
	async fn regenerate_slide_content(
		&self,
		request: &RegenerateSlideRequest,
	) -> Result<String, ApiError>;
	async fn get_image_url(&self, topic: &str) -> Result<Vec<String>, ApiError>;
	async fn upload_image(
		&self,
		bytes: Vec<u8>,
		filename: &str,
		mime: &str,
	) -> Result<ImageUploadResponse, ApiError>;
	async fn create_file(&self, request: &CreateFileRequest) -> Result<String, ApiError>;
}

#[async_trait]
impl EditorBackend for ApiClient {
	async fn generate_presentation(
		&self,
		request: &PresentationRequest,
	) -> Result<GeneratedContent, ApiError> {
		ApiClient::generate_presentation(self, request).await
	}

	async fn generate_document(
		&self,
		request: &DocumentRequest,
	) -> Result<GeneratedContent, ApiError> {
		ApiClient::generate_document(self, request).await
	}

	async fn generate_test(&self, request: &TestRequest) -> Result<TestPayload, ApiError> {
		ApiClient::generate_test(self, request).await
	}

	async fn generate_crossword(
		&self,
		request: &CrosswordRequest,
	) -> Result<CrosswordPayload, ApiError> {
		ApiClient::generate_crossword(self, request).await
	}

	async fn regenerate_slide_content(
		&self,
		request: &RegenerateSlideRequest,
	) -> Result<String, ApiError> {
		ApiClient::regenerate_slide_content(self, request).await
	}

	async fn get_image_url(&self, topic: &str) -> Result<Vec<String>, ApiError> {
		ApiClient::get_image_url(self, topic).await
	}

	async fn upload_image(
		&self,
		bytes: Vec<u8>,
		filename: &str,
		mime: &str,
	) -> Result<ImageUploadResponse, ApiError> {
		ApiClient::upload_image(self, bytes, filename, mime).await
	}

	async fn create_file(&self, request: &CreateFileRequest) -> Result<String, ApiError> {
		ApiClient::create_file(self, request).await
	}
}

fn not_found() -> ApiError {
	ApiError::Validation(SLIDE_NOT_FOUND_MESSAGE.to_string())
}

/// Следующая картинка из пула после текущей. `None`, если другой нет.
pub fn pick_next_image(pool: &[String], current: Option<&str>) -> Option<String> {
	let next = match current.and_then(|c| pool.iter().position(|url| url == c)) {
		Some(index) => pool.get((index + 1) % pool.len()),
		None => pool.first(),
	}?;
	if Some(next.as_str()) == current {
		return None;
	}
	Some(next.clone())
}

/// Пул по теме: сначала кэш, при промахе запрос к backend.
pub async fn image_pool(
	api: &dyn EditorBackend,
	cache: &ImagePoolCache,
	topic: &str,
) -> Result<Vec<String>, ApiError> {
	if let Some(pool) = cache.get(topic)? {
		debug!("image pool for {} served from cache", topic);
		return Ok(pool);
	}
	let pool = api.get_image_url(topic).await?;
	if !pool.is_empty() {
		cache.put(topic, &pool)?;
	}
	Ok(pool)
}

/// Редактируемый результат генерации.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
	settings: EditorSettings,
	generated: GeneratedContent,
	slides: Vec<EditableSlide>,
}

impl Editor {
	/// Вызывает нужный эндпоинт генерации по типу документа.
	pub async fn generate(
		api: &dyn EditorBackend,
		token: &str,
		settings: EditorSettings,
	) -> Result<Editor, ApiError> {
		info!(
			"[Editor] generating {} on {:?}",
			settings.doc_type, settings.topic
		);
		let editor = match settings.doc_type {
			DocType::Presentation => {
				let content = api
					.generate_presentation(&PresentationRequest {
						token: token.to_string(),
						topic: settings.topic.clone(),
						lang: settings.lang.clone(),
						slides_count: settings.slide_count,
						with_image: settings.with_images,
						sources: settings.sources(),
					})
					.await?;
				Editor::from_generated(settings, content)
			}
			DocType::Abstract => {
				let content = api
					.generate_document(&DocumentRequest {
						token: token.to_string(),
						topic: settings.topic.clone(),
						lang: settings.lang.clone(),
						slides_count: settings.slide_count,
						sources: settings.sources(),
					})
					.await?;
				Editor::from_generated(settings, content)
			}
			DocType::Test => {
				let payload = api
					.generate_test(&TestRequest {
						token: token.to_string(),
						topic: settings.topic.clone(),
						lang: settings.lang.clone(),
						question_count: settings.question_count,
						difficulty: settings.difficulty,
						sources: settings.sources(),
					})
					.await?;
				Editor::from_test(settings, payload)
			}
			DocType::Crossword => {
				let payload = api
					.generate_crossword(&CrosswordRequest {
						token: token.to_string(),
						topic: settings.topic.clone(),
						lang: settings.lang.clone(),
						word_count: settings.word_count,
						difficulty: settings.difficulty,
					})
					.await?;
				Editor::from_crossword(settings, payload)
			}
		};
		info!("[Editor] {} slides ready", editor.slides.len());
		Ok(editor)
	}

	/// Титульный слайд, план и слайды с контентом.
	pub fn from_generated(settings: EditorSettings, generated: GeneratedContent) -> Editor {
		let mut slides = Vec::with_capacity(generated.slides.len() + 2);
		slides.push(EditableSlide::Title(TitleSlide {
			title: settings.topic.clone(),
			author: settings.full_name.clone(),
			institution: settings.institution.joined(),
		}));
		slides.push(EditableSlide::Plan(PlanSlide {
			title: PLAN_TITLE.to_string(),
			items: generated.plans.clone(),
		}));
		slides.extend(generated.slides.iter().cloned().map(EditableSlide::Content));

		Editor {
			settings,
			generated,
			slides,
		}
	}

	pub fn from_test(settings: EditorSettings, payload: TestPayload) -> Editor {
		Editor {
			settings,
			generated: GeneratedContent::default(),
			slides: vec![EditableSlide::Test(payload)],
		}
	}

	pub fn from_crossword(settings: EditorSettings, payload: CrosswordPayload) -> Editor {
		Editor {
			settings,
			generated: GeneratedContent::default(),
			slides: vec![EditableSlide::Crossword(payload)],
		}
	}

	pub fn settings(&self) -> &EditorSettings {
		&self.settings
	}

	pub fn slides(&self) -> &[EditableSlide] {
		&self.slides
	}

	pub fn content_slides(&self) -> impl Iterator<Item = &ContentSlide> {
		self.slides.iter().filter_map(EditableSlide::as_content)
	}

	fn content_mut(&mut self, index: usize) -> Result<&mut ContentSlide, ApiError> {
		self.slides
			.iter_mut()
			.filter_map(EditableSlide::as_content_mut)
			.nth(index)
			.ok_or_else(not_found)
	}

	pub fn test_mut(&mut self) -> Option<&mut TestPayload> {
		self.slides.iter_mut().find_map(|slide| match slide {
			EditableSlide::Test(payload) => Some(payload),
			_ => None,
		})
	}

	pub fn crossword_mut(&mut self) -> Option<&mut CrosswordPayload> {
		self.slides.iter_mut().find_map(|slide| match slide {
			EditableSlide::Crossword(payload) => Some(payload),
			_ => None,
		})
	}

	pub fn set_title_field(&mut self, field: TitleField, value: &str) -> Result<(), ApiError> {
		let title = self
			.slides
			.iter_mut()
			.find_map(|slide| match slide {
				EditableSlide::Title(title) => Some(title),
				_ => None,
			})
			.ok_or_else(not_found)?;
		let target = match field {
			TitleField::Title => &mut title.title,
			TitleField::Author => &mut title.author,
			TitleField::Institution => &mut title.institution,
		};
		*target = value.to_string();
		Ok(())
	}

	pub fn set_plan_title(&mut self, value: &str) -> Result<(), ApiError> {
		self.plan_mut()?.title = value.to_string();
		Ok(())
	}

	pub fn set_plan_item(&mut self, item: usize, value: &str) -> Result<(), ApiError> {
		let slot = self.plan_mut()?.items.get_mut(item).ok_or_else(not_found)?;
		*slot = value.to_string();
		Ok(())
	}

	fn plan_mut(&mut self) -> Result<&mut PlanSlide, ApiError> {
		self.slides
			.iter_mut()
			.find_map(|slide| match slide {
				EditableSlide::Plan(plan) => Some(plan),
				_ => None,
			})
			.ok_or_else(not_found)
	}

	pub fn set_content_title(&mut self, slide: usize, value: &str) -> Result<(), ApiError> {
		self.content_mut(slide)?.title = value.to_string();
		Ok(())
	}

	pub fn set_content_item(&mut self, slide: usize, item: usize, value: &str) -> Result<(), ApiError> {
		let slot = self
			.content_mut(slide)?
			.content
			.get_mut(item)
			.ok_or_else(not_found)?;
		*slot = value.to_string();
		Ok(())
	}

	pub fn set_image(&mut self, slide: usize, url: Option<String>) -> Result<(), ApiError> {
		self.content_mut(slide)?.image_url = url;
		Ok(())
	}

	/// Перегенерирует один абзац слайда.
	pub async fn regenerate_text(
		&mut self,
		api: &dyn EditorBackend,
		token: &str,
		slide: usize,
		item: usize,
	) -> Result<(), ApiError> {
		let slide_topic = self
			.content_slides()
			.nth(slide)
			.map(|s| s.title.clone())
			.ok_or_else(not_found)?;
		let new_content = api
			.regenerate_slide_content(&RegenerateSlideRequest {
				token: token.to_string(),
				main_topic: self.settings.topic.clone(),
				slide_topic,
				lang: self.settings.lang.clone(),
				sources: self.settings.sources(),
			})
			.await?;
		self.set_content_item(slide, item, &new_content)
	}

	/// Ставит на слайд следующую картинку из пула. `Ok(None)`, если
	/// сменить не на что.
	pub fn apply_next_image(
		&mut self,
		slide: usize,
		pool: &[String],
	) -> Result<Option<String>, ApiError> {
		let target = self.content_mut(slide)?;
		let next = pick_next_image(pool, target.image_url.as_deref());
		if let Some(url) = &next {
			target.image_url = Some(url.clone());
		}
		Ok(next)
	}

	pub async fn next_image(
		&mut self,
		api: &dyn EditorBackend,
		cache: &ImagePoolCache,
		slide: usize,
	) -> Result<Option<String>, ApiError> {
		let pool = image_pool(api, cache, &self.settings.topic).await?;
		let next = self.apply_next_image(slide, &pool)?;
		if next.is_none() {
			info!("[Editor] {}", NO_NEW_IMAGE_MESSAGE);
		}
		Ok(next)
	}

	/// Загружает свою картинку (PNG/JPEG до 5 МБ) и ставит ее на слайд.
	pub async fn upload_image(
		&mut self,
		api: &dyn EditorBackend,
		slide: usize,
		bytes: Vec<u8>,
		filename: &str,
		mime: &str,
	) -> Result<String, ApiError> {
		validate_image_upload(mime, bytes.len() as u64)?;
		self.content_mut(slide)?;
		let uploaded = api.upload_image(bytes, filename, mime).await?;
		self.set_image(slide, Some(uploaded.image_url.clone()))?;
		Ok(uploaded.image_url)
	}

	/// Собирает запрос `create_file` из отредактированных слайдов.
	pub fn create_file_request(&self, token: &str) -> Result<CreateFileRequest, ApiError> {
		let data = match self.slides.as_slice() {
			[EditableSlide::Test(payload)] => serde_json::to_value(payload),
			[EditableSlide::Crossword(payload)] => serde_json::to_value(payload),
			slides => {
				let plans = slides
					.iter()
					.find_map(|slide| match slide {
						EditableSlide::Plan(plan) => Some(plan.items.clone()),
						_ => None,
					})
					.unwrap_or_default();
				serde_json::to_value(GeneratedContent {
					plans,
					slides: self.content_slides().cloned().collect(),
					extra: self.generated.extra.clone(),
				})
			}
		}
		.map_err(|e| ApiError::Decode(e.to_string()))?;

		Ok(CreateFileRequest {
			token: token.to_string(),
			generated_content_data: data,
			full_name: self.settings.full_name.clone(),
			topic: self.settings.topic.clone(),
			doc_lang: self.settings.lang.clone(),
			institution_info: self.settings.institution.clone(),
			template_name: self.settings.template_name(),
			file_type: self.settings.doc_type.file_type().as_str().to_string(),
			sources: self.settings.sources(),
		})
	}

	pub async fn save(&self, api: &dyn EditorBackend, token: &str) -> Result<GenerationTask, ApiError> {
		info!("[Editor] saving {:?}", self.settings.topic);
		let request = self.create_file_request(token)?;
		let task_id = api.create_file(&request).await.map_err(|e| {
			warn!("[Editor] create_file failed: {}", e);
			e
		})?;
		Ok(GenerationTask {
			task_id,
			doc_title: self.settings.topic.clone(),
			doc_type: self.settings.doc_type,
		})
	}
}
