use thiserror::Error;

use crate::forms::FormErrors;

pub const NETWORK_ERROR_MESSAGE: &str =
	"Serverga ulanib bo'lmadi. Internet aloqasini yoki server holatini tekshiring.";
pub const INSUFFICIENT_BALANCE_MESSAGE: &str = "Balans yetarli emas";
pub const UPLOAD_FAILED_MESSAGE: &str = "Could not upload file";
pub const UPLOAD_NETWORK_MESSAGE: &str = "Network error during upload";

/// Ошибки обращения к backend и к сервису поиска.
///
/// `Display` всегда отдает готовое для пользователя сообщение.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("{}", NETWORK_ERROR_MESSAGE)]
	Network,

	#[error("{0}")]
	InsufficientBalance(String),

	#[error("{message}")]
	Server { status: u16, message: String },

	#[error("Serverdan kutilmagan javob keldi (status: {status})")]
	UnexpectedResponse { status: u16 },

	#[error("{0}")]
	Upload(String),

	#[error("Javobni o'qib bo'lmadi: {0}")]
	Decode(String),

	#[error("Serverdan {0} kelmadi.")]
	MissingField(&'static str),

	#[error("{0}")]
	Validation(String),

	#[error(transparent)]
	Form(#[from] FormErrors),

	#[error("Ma'lumotni saqlab bo'lmadi: {0}")]
	Storage(#[from] StorageError),
}

impl ApiError {
	pub fn status(&self) -> Option<u16> {
		match self {
			ApiError::InsufficientBalance(_) => Some(402),
			ApiError::Server { status, .. } | ApiError::UnexpectedResponse { status } => {
				Some(*status)
			}
			_ => None,
		}
	}

	pub fn is_insufficient_balance(&self) -> bool {
		matches!(self, ApiError::InsufficientBalance(_))
	}
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Missing the environment variable {0}")]
	MissingVar(String),
	#[error("Invalid value for the environment variable {0}: {1}")]
	InvalidValue(String, String),
}

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("storage io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("storage serialization error: {0}")]
	Serde(#[from] serde_json::Error),
}

/// Ошибки фоновых задач (`PROCESSING_TYPE`).
#[derive(Debug, Error)]
pub enum ProcessingError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Api(#[from] ApiError),
	#[error(transparent)]
	Storage(#[from] StorageError),
	#[error("sitemap error: {0}")]
	Sitemap(String),
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error("{0}")]
	Failed(String),
}
