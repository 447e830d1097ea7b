use log::{info, warn};

use crate::error::StorageError;
use crate::forms::EditorSettings;
use crate::models::{Document, GenerationTask};
use crate::storage::DocumentList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
	#[default]
	Documents,
	Create,
	Editor,
	Status,
	Profile,
	Support,
	Faq,
}

impl Screen {
	pub fn route(&self) -> &'static str {
		match self {
			Screen::Documents => "hujjatlarim",
			Screen::Create => "yaratish",
			Screen::Editor => "muharrir",
			Screen::Status => "status",
			Screen::Profile => "profil",
			Screen::Support => "support",
			Screen::Faq => "faq",
		}
	}

	/// Нижняя навигация не показывается на этих экранах.
	pub fn shows_bottom_nav(&self) -> bool {
		!matches!(self, Screen::Support | Screen::Faq | Screen::Status)
	}
}

/// Активный экран и данные, без которых редактор и статус не открываются.
#[derive(Debug, Default)]
pub struct Navigator {
	screen: Screen,
	editor_settings: Option<EditorSettings>,
	task: Option<GenerationTask>,
}

impl Navigator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn screen(&self) -> Screen {
		self.screen
	}

	pub fn editor_settings(&self) -> Option<&EditorSettings> {
		self.editor_settings.as_ref()
	}

	pub fn task(&self) -> Option<&GenerationTask> {
		self.task.as_ref()
	}

	/// Переход на экран. Редактор без настроек и статус без задачи
	/// уводят на список документов.
	pub fn navigate(&mut self, screen: Screen) -> Screen {
		let target = match screen {
			Screen::Editor if self.editor_settings.is_none() => Screen::Documents,
			Screen::Status if self.task.is_none() => Screen::Documents,
			other => other,
		};
		if target != screen {
			warn!("[Nav] {} has no payload, redirecting to {}", screen.route(), target.route());
		} else {
			info!("[Nav] -> {}", target.route());
		}
		self.screen = target;
		target
	}

	pub fn navigate_to_editor(&mut self, settings: EditorSettings) -> Screen {
		self.editor_settings = Some(settings);
		self.navigate(Screen::Editor)
	}

	pub fn navigate_to_status(&mut self, task: GenerationTask) -> Screen {
		self.task = Some(task);
		self.navigate(Screen::Status)
	}

	/// Готовый документ попадает в список, пользователь возвращается к нему.
	pub fn on_generation_success(
		&mut self,
		doc: Document,
		list: &mut DocumentList,
	) -> Result<bool, StorageError> {
		let added = list.add(doc)?;
		self.task = None;
		self.navigate(Screen::Documents);
		Ok(added)
	}
}
