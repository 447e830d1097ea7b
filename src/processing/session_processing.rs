use log::{info, warn};
use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::ProcessingError;
use crate::services::Session;
use crate::storage::{DocumentList, FileStore, KeyValueStore, SessionStore};

/// Проверяет сохраненную сессию и выводит профиль и документы.
pub async fn session_processing(config: &Config) -> Result<(), ProcessingError> {
	let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path)?);
	let api = ApiClient::new(config.api_base_url.clone())?;
	let mut session = Session::new(Arc::new(api), SessionStore::new(store.clone()));

	if !session.restore().await? {
		warn!("no valid session in {}", config.storage_path.display());
		return Ok(());
	}

	if let Some(user) = session.user() {
		info!(
			"user {} ({}), balance {} so'm",
			user.chat_id, user.full_name, user.balance
		);
	}

	let documents = DocumentList::open(store)?;
	info!("{} documents saved locally", documents.len());
	for doc in documents.docs() {
		info!("  {} [{}] {} {}", doc.date, doc.doc_type, doc.title, doc.download_url);
	}
	Ok(())
}
