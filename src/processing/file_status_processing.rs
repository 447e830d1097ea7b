use log::{error, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{ConfigError, ProcessingError, StorageError};
use crate::models::GenerationTask;
use crate::services::{GenerationOutcome, GenerationWatcher};
use crate::storage::{DocumentList, FileStore, KeyValueStore};
use crate::utils::SystemClock;

/// Ждет готовности файла по `TASK_ID` и добавляет его в список документов.
pub async fn file_status_processing(config: &Config) -> Result<(), ProcessingError> {
	let task_id = config
		.task_id
		.clone()
		.ok_or_else(|| ConfigError::MissingVar("TASK_ID".to_string()))?;
	let task = GenerationTask {
		doc_title: config.task_title.clone().unwrap_or_else(|| task_id.clone()),
		task_id,
		doc_type: config.task_doc_type,
	};

	let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path)?);
	let mut documents = DocumentList::open(store)?;
	let api = ApiClient::new(config.api_base_url.clone())?;
	let watcher = GenerationWatcher::new(
		Arc::new(api),
		config.file_poll_schedule(),
		Arc::new(SystemClock),
	);

	let cancel = CancellationToken::new();
	let ctrl_c = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			ctrl_c.cancel();
		}
	});

	let mut saved: Result<bool, StorageError> = Ok(false);
	let outcome = watcher
		.watch(&task, &cancel, |doc| saved = documents.add(doc.clone()))
		.await?;

	match outcome {
		GenerationOutcome::Completed(doc) => {
			if saved? {
				info!("{} added to documents", doc.title);
			}
			info!("download: {}", doc.download_url);
			Ok(())
		}
		GenerationOutcome::Failed(message) => {
			error!("task {} failed: {}", task.task_id, message);
			Err(ProcessingError::Failed(message))
		}
		GenerationOutcome::Cancelled => {
			warn!("task {} watch cancelled", task.task_id);
			Ok(())
		}
		GenerationOutcome::AlreadyRunning | GenerationOutcome::AlreadyFinished => Ok(()),
	}
}
