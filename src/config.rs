use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::DocType;
use crate::services::PollSchedule;

pub const DEFAULT_API_BASE_URL: &str = "https://api.tm.ismailov.uz";
pub const DEFAULT_SEARCH_API_BASE: &str = "https://api.tqdm.ismailov.uz";
pub const DEFAULT_SITE_URL: &str = "https://taqdimot.ismailov.uz";

#[derive(Debug, Clone)]
pub struct Config {
	pub api_base_url: String,
	pub search_api_base: String,
	pub site_url: String,
	pub sitemap_output: PathBuf,
	pub sitemap_limit: usize,
	pub storage_path: PathBuf,
	pub file_poll_fast: Duration,
	pub file_poll_fast_attempts: u32,
	pub file_poll_slow: Duration,
	pub payment_poll: Duration,
	pub processing_type: String,
	pub task_id: Option<String>,
	pub task_title: Option<String>,
	pub task_doc_type: DocType,
}

impl Config {
	/// Читает `.env` и переменные окружения.
	pub fn init() -> Result<Config, ConfigError> {
		dotenv::dotenv().ok();
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let url = |key: &str, default: &str| {
			lookup(key)
				.unwrap_or_else(|| default.to_string())
				.trim_end_matches('/')
				.to_string()
		};

		let sitemap_limit = parse_or(&lookup, "SITEMAP_LIMIT", 1000usize)?;
		if sitemap_limit == 0 {
			return Err(ConfigError::InvalidValue(
				"SITEMAP_LIMIT".to_string(),
				"must be greater than zero".to_string(),
			));
		}

		Ok(Config {
			api_base_url: url("API_BASE_URL", DEFAULT_API_BASE_URL),
			search_api_base: url("SEARCH_API_BASE", DEFAULT_SEARCH_API_BASE),
			site_url: url("SITE_URL", DEFAULT_SITE_URL),
			sitemap_output: lookup("SITEMAP_OUTPUT")
				.map(PathBuf::from)
				.unwrap_or_else(|| PathBuf::from("dist/sitemap.xml")),
			sitemap_limit,
			storage_path: lookup("STORAGE_PATH")
				.map(PathBuf::from)
				.unwrap_or_else(|| PathBuf::from(".taqdimot/storage.json")),
			file_poll_fast: Duration::from_millis(parse_or(&lookup, "FILE_POLL_FAST_MS", 2000u64)?),
			file_poll_fast_attempts: parse_or(&lookup, "FILE_POLL_FAST_ATTEMPTS", 5u32)?,
			file_poll_slow: Duration::from_millis(parse_or(&lookup, "FILE_POLL_SLOW_MS", 5000u64)?),
			payment_poll: Duration::from_millis(parse_or(&lookup, "PAYMENT_POLL_MS", 3000u64)?),
			processing_type: lookup("PROCESSING_TYPE").unwrap_or_else(|| "sitemap".to_string()),
			task_id: lookup("TASK_ID").filter(|id| !id.trim().is_empty()),
			task_title: lookup("TASK_TITLE").filter(|t| !t.trim().is_empty()),
			task_doc_type: parse_or(&lookup, "TASK_DOC_TYPE", DocType::Presentation)?,
		})
	}

	pub fn file_poll_schedule(&self) -> PollSchedule {
		PollSchedule::Progressive {
			fast: self.file_poll_fast,
			fast_attempts: self.file_poll_fast_attempts,
			slow: self.file_poll_slow,
		}
	}

	pub fn payment_poll_schedule(&self) -> PollSchedule {
		PollSchedule::Fixed(self.payment_poll)
	}
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
	F: Fn(&str) -> Option<String>,
	T: std::str::FromStr,
	T::Err: std::fmt::Display,
{
	match lookup(key) {
		None => Ok(default),
		Some(raw) => raw
			.trim()
			.parse::<T>()
			.map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
		let env: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		Config::from_lookup(|key| env.get(key).cloned())
	}

	#[test]
	fn defaults_when_environment_is_empty() {
		let config = config_from(&[]).unwrap();
		assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
		assert_eq!(config.search_api_base, DEFAULT_SEARCH_API_BASE);
		assert_eq!(config.sitemap_output, PathBuf::from("dist/sitemap.xml"));
		assert_eq!(config.sitemap_limit, 1000);
		assert_eq!(config.processing_type, "sitemap");
		assert_eq!(config.payment_poll, Duration::from_secs(3));
		assert!(config.task_id.is_none());
	}

	#[test]
	fn overrides_trim_trailing_slash() {
		let config = config_from(&[
			("API_BASE_URL", "http://localhost:8000/"),
			("FILE_POLL_FAST_ATTEMPTS", "3"),
			("TASK_ID", "abc"),
		])
		.unwrap();
		assert_eq!(config.api_base_url, "http://localhost:8000");
		assert_eq!(config.file_poll_fast_attempts, 3);
		assert_eq!(config.task_id.as_deref(), Some("abc"));
		assert_eq!(config.task_doc_type, DocType::Presentation);
	}

	#[test]
	fn task_doc_type_accepts_labels() {
		let config = config_from(&[("TASK_DOC_TYPE", "referat")]).unwrap();
		assert_eq!(config.task_doc_type, DocType::Abstract);
		assert!(config_from(&[("TASK_DOC_TYPE", "slayd")]).is_err());
	}

	#[test]
	fn rejects_non_numeric_interval() {
		let err = config_from(&[("PAYMENT_POLL_MS", "soon")]).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue(key, _) if key == "PAYMENT_POLL_MS"));
	}

	#[test]
	fn rejects_zero_sitemap_limit() {
		assert!(config_from(&[("SITEMAP_LIMIT", "0")]).is_err());
	}
}
