use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Document, FileState, FileStatusResponse, GenerationTask};
use crate::services::{
	poll_until, ErrorPolicy, GuardState, OnceGuard, PollOutcome, PollSchedule, PollStep,
};
use crate::utils::Clock;

pub const GENERATION_FAILED_MESSAGE: &str = "Fayl yaratishda xatolik yuz berdi. Iltimos, qayta urinib ko'ring yoki administrator bilan bog'laning.";
pub const MISSING_TASK_MESSAGE: &str =
	"Fayl yaratish uchun kerakli ma'lumot (task_id) topilmadi.";

#[async_trait]
pub trait FileStatusSource: Send + Sync {
	async fn file_status(&self, task_id: &str) -> Result<FileStatusResponse, ApiError>;
	fn download_url(&self, file_path: &str) -> String;
}

#[async_trait]
impl FileStatusSource for ApiClient {
	async fn file_status(&self, task_id: &str) -> Result<FileStatusResponse, ApiError> {
		ApiClient::file_status(self, task_id).await
	}

	fn download_url(&self, file_path: &str) -> String {
		ApiClient::download_url(self, file_path)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
	Completed(Document),
	Failed(String),
	Cancelled,
	AlreadyRunning,
	AlreadyFinished,
}

enum Terminal {
	Completed(String),
	Failed(String),
}

async fn check_file_status(
	source: Arc<dyn FileStatusSource>,
	task_id: String,
	attempt: u32,
) -> Result<PollStep<Terminal>, ApiError> {
	let status = source.file_status(&task_id).await?;
	info!("task {} check #{}: {}", task_id, attempt, status.status);
	match status.state() {
		FileState::Completed => {
			let path = status
				.file_path
				.filter(|p| !p.is_empty())
				.ok_or(ApiError::MissingField("file_path"))?;
			Ok(PollStep::Done(Terminal::Completed(path)))
		}
		FileState::Failed => Ok(PollStep::Done(Terminal::Failed(
			status
				.message
				.unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string()),
		))),
		FileState::Running(_) => Ok(PollStep::Pending),
	}
}

/// Следит за сборкой файла до `completed` / `failed`.
#[derive(Clone)]
pub struct GenerationWatcher {
	source: Arc<dyn FileStatusSource>,
	guard: OnceGuard,
	schedule: PollSchedule,
	clock: Arc<dyn Clock>,
}

impl GenerationWatcher {
	pub fn new(
		source: Arc<dyn FileStatusSource>,
		schedule: PollSchedule,
		clock: Arc<dyn Clock>,
	) -> Self {
		Self {
			source,
			guard: OnceGuard::new(),
			schedule,
			clock,
		}
	}

	pub fn guard(&self) -> &OnceGuard {
		&self.guard
	}

	/// `on_complete` вызывается не больше одного раза на task id, даже если
	/// `watch` запускают повторно.
	pub async fn watch<F>(
		&self,
		task: &GenerationTask,
		cancel: &CancellationToken,
		on_complete: F,
	) -> Result<GenerationOutcome, ApiError>
	where
		F: FnOnce(&Document),
	{
		if task.task_id.trim().is_empty() {
			return Err(ApiError::Validation(MISSING_TASK_MESSAGE.to_string()));
		}

		let ticket = match self.guard.try_start(&task.task_id) {
			Ok(ticket) => ticket,
			Err(GuardState::Done) => return Ok(GenerationOutcome::AlreadyFinished),
			Err(_) => return Ok(GenerationOutcome::AlreadyRunning),
		};

		info!(
			"watching task {} ({} '{}')",
			task.task_id, task.doc_type, task.doc_title
		);

		let outcome = poll_until(self.schedule, cancel, ErrorPolicy::Stop, |attempt| {
			check_file_status(self.source.clone(), task.task_id.clone(), attempt)
		})
		.await
		.map_err(|e| {
			error!("task {} status check failed: {}", task.task_id, e);
			e
		})?;

		match outcome {
			PollOutcome::Cancelled => {
				info!("task {} watch cancelled", task.task_id);
				Ok(GenerationOutcome::Cancelled)
			}
			PollOutcome::Finished(Terminal::Failed(message)) => {
				ticket.finish();
				Ok(GenerationOutcome::Failed(message))
			}
			PollOutcome::Finished(Terminal::Completed(path)) => {
				ticket.finish();
				let doc = Document {
					title: task.doc_title.clone(),
					date: self.clock.today(),
					download_url: self.source.download_url(&path),
					doc_type: task.doc_type,
					file_type: task.doc_type.file_type(),
				};
				info!("task {} ready: {}", task.task_id, doc.download_url);
				on_complete(&doc);
				Ok(GenerationOutcome::Completed(doc))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::{DocType, FileType};
	use crate::utils::ManualClock;
	use chrono::{TimeZone, Utc};
	use parking_lot::Mutex;
	use std::collections::VecDeque;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::time::Duration;

	struct ScriptedStatus {
		replies: Mutex<VecDeque<Result<FileStatusResponse, ApiError>>>,
		calls: AtomicU32,
	}

	impl ScriptedStatus {
		fn new(replies: Vec<Result<FileStatusResponse, ApiError>>) -> Arc<Self> {
			Arc::new(Self {
				replies: Mutex::new(replies.into()),
				calls: AtomicU32::new(0),
			})
		}
	}

	fn status(s: &str, path: Option<&str>) -> Result<FileStatusResponse, ApiError> {
		Ok(FileStatusResponse {
			status: s.into(),
			file_path: path.map(String::from),
			message: None,
		})
	}

	#[async_trait]
	impl FileStatusSource for ScriptedStatus {
		async fn file_status(&self, _task_id: &str) -> Result<FileStatusResponse, ApiError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.replies
				.lock()
				.pop_front()
				.unwrap_or_else(|| status("processing", None))
		}

		fn download_url(&self, file_path: &str) -> String {
			format!("https://api.test/download_file/{}", file_path)
		}
	}

	fn watcher(source: Arc<ScriptedStatus>) -> GenerationWatcher {
		let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap());
		GenerationWatcher::new(
			source,
			PollSchedule::Fixed(Duration::from_millis(1)),
			Arc::new(clock),
		)
	}

	fn task() -> GenerationTask {
		GenerationTask {
			task_id: "t-1".into(),
			doc_title: "Atom tuzilishi".into(),
			doc_type: DocType::Abstract,
		}
	}

	#[tokio::test]
	async fn completes_once_and_builds_document() {
		let source = ScriptedStatus::new(vec![
			status("pending", None),
			status("processing", None),
			status("completed", Some("files/atom.docx")),
		]);
		let watcher = watcher(source.clone());
		let fired = AtomicU32::new(0);

		let outcome = watcher
			.watch(&task(), &CancellationToken::new(), |_| {
				fired.fetch_add(1, Ordering::SeqCst);
			})
			.await
			.unwrap();

		let doc = match outcome {
			GenerationOutcome::Completed(doc) => doc,
			other => panic!("expected completion, got {:?}", other),
		};
		assert_eq!(doc.title, "Atom tuzilishi");
		assert_eq!(doc.date, "2024-09-01");
		assert_eq!(doc.download_url, "https://api.test/download_file/files/atom.docx");
		assert_eq!(doc.file_type, FileType::Docx);
		assert_eq!(source.calls.load(Ordering::SeqCst), 3);

		let again = watcher
			.watch(&task(), &CancellationToken::new(), |_| {
				fired.fetch_add(1, Ordering::SeqCst);
			})
			.await
			.unwrap();
		assert_eq!(again, GenerationOutcome::AlreadyFinished);
		assert_eq!(fired.load(Ordering::SeqCst), 1);
		assert_eq!(source.calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn failed_status_stops_polling() {
		let source = ScriptedStatus::new(vec![status("processing", None), status("failed", None)]);
		let outcome = watcher(source.clone())
			.watch(&task(), &CancellationToken::new(), |_| panic!("no completion"))
			.await
			.unwrap();
		assert_eq!(
			outcome,
			GenerationOutcome::Failed(GENERATION_FAILED_MESSAGE.to_string())
		);
		assert_eq!(source.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn request_error_is_surfaced_and_task_can_be_retried() {
		let source = ScriptedStatus::new(vec![
			Err(ApiError::Network),
			status("completed", Some("a.docx")),
		]);
		let watcher = watcher(source);
		let err = watcher
			.watch(&task(), &CancellationToken::new(), |_| {})
			.await
			.unwrap_err();
		assert!(matches!(err, ApiError::Network));
		assert_eq!(watcher.guard().state("t-1"), GuardState::NotStarted);

		let outcome = watcher
			.watch(&task(), &CancellationToken::new(), |_| {})
			.await
			.unwrap();
		assert!(matches!(outcome, GenerationOutcome::Completed(_)));
	}

	#[tokio::test]
	async fn concurrent_watch_of_same_task_is_rejected() {
		let source = ScriptedStatus::new(vec![]);
		let watcher = watcher(source);
		let cancel = CancellationToken::new();

		let first = {
			let watcher = watcher.clone();
			let cancel = cancel.clone();
			tokio::spawn(async move { watcher.watch(&task(), &cancel, |_| {}).await })
		};
		while watcher.guard().state("t-1") != GuardState::InFlight {
			tokio::task::yield_now().await;
		}

		let second = watcher
			.watch(&task(), &CancellationToken::new(), |_| {})
			.await
			.unwrap();
		assert_eq!(second, GenerationOutcome::AlreadyRunning);

		cancel.cancel();
		let first = first.await.unwrap().unwrap();
		assert_eq!(first, GenerationOutcome::Cancelled);
		assert_eq!(watcher.guard().state("t-1"), GuardState::NotStarted);
	}

	#[tokio::test]
	async fn empty_task_id_is_rejected() {
		let source = ScriptedStatus::new(vec![]);
		let mut task = task();
		task.task_id = " ".into();
		let err = watcher(source)
			.watch(&task, &CancellationToken::new(), |_| {})
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), MISSING_TASK_MESSAGE);
	}
}
