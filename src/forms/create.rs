use log::debug;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ApiError;
use crate::models::{
	template_path, Difficulty, DocType, InstitutionInfo, User, DEFAULT_TEMPLATE,
	DEFAULT_TEMPLATE_CATEGORY,
};

pub const SLIDE_COUNT_RANGE: (u32, u32) = (6, 20);
pub const QUESTION_COUNT_RANGE: (u32, u32) = (10, 50);
pub const WORD_COUNT_RANGE: (u32, u32) = (5, 30);
pub const ABSTRACT_SLIDE_COUNT: u32 = 20;

pub const FULL_NAME_REQUIRED_MESSAGE: &str = "Ism-familiyani kiriting.";
pub const TOPIC_REQUIRED_MESSAGE: &str = "Mavzuni kiriting.";
pub const SLIDE_COUNT_MESSAGE: &str = "Slaydlar soni 6 va 20 orasida bo'lishi kerak.";
pub const QUESTION_COUNT_MESSAGE: &str = "Savollar soni 10 va 50 orasida bo'lishi kerak.";
pub const WORD_COUNT_MESSAGE: &str = "So'zlar soni 5 va 30 orasida bo'lishi kerak.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
	FullName,
	Topic,
	SlideCount,
	QuestionCount,
	WordCount,
}

/// Ошибки формы по полям.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
	fields: BTreeMap<FormField, String>,
}

impl FormErrors {
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn get(&self, field: FormField) -> Option<&str> {
		self.fields.get(&field).map(String::as_str)
	}

	pub fn has(&self, field: FormField) -> bool {
		self.fields.contains_key(&field)
	}

	pub fn fields(&self) -> impl Iterator<Item = (FormField, &str)> {
		self.fields.iter().map(|(f, m)| (*f, m.as_str()))
	}

	fn add(&mut self, field: FormField, message: &str) {
		self.fields.insert(field, message.to_string());
	}
}

impl fmt::Display for FormErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let messages: Vec<&str> = self.fields.values().map(String::as_str).collect();
		write!(f, "{}", messages.join(" "))
	}
}

impl std::error::Error for FormErrors {}

fn in_range(value: u32, (min, max): (u32, u32)) -> bool {
	(min..=max).contains(&value)
}

/// Все, что экран создания передает в редактор.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
	pub full_name: String,
	pub topic: String,
	pub doc_type: DocType,
	pub lang: String,
	pub with_images: bool,
	pub slide_count: u32,
	pub question_count: u32,
	pub word_count: u32,
	pub difficulty: Difficulty,
	pub template_category: String,
	pub template: String,
	pub institution: InstitutionInfo,
	pub source_file_path: Option<String>,
}

impl EditorSettings {
	pub fn sources(&self) -> Vec<String> {
		self.source_file_path.iter().cloned().collect()
	}

	/// `категория/шаблон` для презентаций, `template` для остальных.
	pub fn template_name(&self) -> String {
		match self.doc_type {
			DocType::Presentation => template_path(&self.template_category, &self.template),
			_ => "template".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
	pub full_name: String,
	pub topic: String,
	pub doc_type: DocType,
	pub lang: String,
	pub with_images: bool,
	pub slide_count: u32,
	pub question_count: u32,
	pub word_count: u32,
	pub difficulty: Difficulty,
	pub template_category: String,
	pub template: String,
	pub institution: InstitutionInfo,
	pub source_file_path: Option<String>,
}

impl Default for CreateForm {
	fn default() -> Self {
		Self {
			full_name: String::new(),
			topic: String::new(),
			doc_type: DocType::Presentation,
			lang: "uz".to_string(),
			with_images: true,
			slide_count: 10,
			question_count: 20,
			word_count: 10,
			difficulty: Difficulty::Medium,
			template_category: DEFAULT_TEMPLATE_CATEGORY.to_string(),
			template: DEFAULT_TEMPLATE.to_string(),
			institution: InstitutionInfo::default(),
			source_file_path: None,
		}
	}
}

impl CreateForm {
	/// Пустая форма с именем из профиля.
	pub fn for_user(user: &User) -> Self {
		Self {
			full_name: user.full_name.clone(),
			..Self::default()
		}
	}

	pub fn validate(&self) -> Result<(), FormErrors> {
		let mut errors = FormErrors::default();

		let needs_name = matches!(self.doc_type, DocType::Presentation | DocType::Abstract);
		if needs_name && self.full_name.trim().is_empty() {
			errors.add(FormField::FullName, FULL_NAME_REQUIRED_MESSAGE);
		}
		if self.topic.trim().is_empty() {
			errors.add(FormField::Topic, TOPIC_REQUIRED_MESSAGE);
		}

		match self.doc_type {
			DocType::Presentation if !in_range(self.slide_count, SLIDE_COUNT_RANGE) => {
				errors.add(FormField::SlideCount, SLIDE_COUNT_MESSAGE)
			}
			DocType::Test if !in_range(self.question_count, QUESTION_COUNT_RANGE) => {
				errors.add(FormField::QuestionCount, QUESTION_COUNT_MESSAGE)
			}
			DocType::Crossword if !in_range(self.word_count, WORD_COUNT_RANGE) => {
				errors.add(FormField::WordCount, WORD_COUNT_MESSAGE)
			}
			_ => {}
		}

		if errors.is_empty() {
			Ok(())
		} else {
			debug!("create form rejected: {}", errors);
			Err(errors)
		}
	}

	/// Стоимость документа по прайсу пользователя.
	pub fn required_balance(&self, user: &User) -> i64 {
		let base = match self.doc_type {
			DocType::Presentation if self.with_images => user.price_presentation_with_images,
			DocType::Presentation => user.price_presentation,
			DocType::Abstract => user.price_abstract,
			DocType::Test => user.price_test_per_question * i64::from(self.question_count),
			DocType::Crossword => user.price_crossword_per_word * i64::from(self.word_count),
		};
		match self.source_file_path {
			Some(_) => base + user.price_with_source,
			None => base,
		}
	}

	pub fn check_balance(&self, user: &User) -> Result<(), ApiError> {
		let required = self.required_balance(user);
		if user.balance < required {
			return Err(ApiError::InsufficientBalance(format!(
				"Balans yetarli emas! Kerakli summa: {} so'm.",
				required
			)));
		}
		Ok(())
	}

	pub fn into_settings(self) -> EditorSettings {
		let (with_images, slide_count) = match self.doc_type {
			DocType::Abstract => (false, ABSTRACT_SLIDE_COUNT),
			DocType::Presentation => (self.with_images, self.slide_count),
			_ => (false, self.slide_count),
		};

		EditorSettings {
			full_name: self.full_name.trim().to_string(),
			topic: self.topic.trim().to_string(),
			doc_type: self.doc_type,
			lang: self.lang,
			with_images,
			slide_count,
			question_count: self.question_count,
			word_count: self.word_count,
			difficulty: self.difficulty,
			template_category: self.template_category,
			template: self.template,
			institution: self.institution,
			source_file_path: self.source_file_path,
		}
	}

	/// Проверка формы и баланса перед переходом в редактор.
	pub fn submit(self, user: &User) -> Result<EditorSettings, ApiError> {
		self.validate()?;
		self.check_balance(user)?;
		Ok(self.into_settings())
	}
}
