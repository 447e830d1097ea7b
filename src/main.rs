use dotenv::dotenv;
use log::{error, info};
use std::error::Error;

use taqdimot::config::Config;
use taqdimot::processing::{file_status_processing, session_processing, sitemap_processing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv().ok();

	if std::env::var_os("RUST_LOG").is_none() {
		std::env::set_var("RUST_LOG", "taqdimot=info");
	}
	env_logger::init();

	let config = Config::init()?;
	info!("PROCESSING_TYPE: {}", &config.processing_type);

	match config.processing_type.as_str() {
		"sitemap" => sitemap_processing(&config).await?,
		"session" => session_processing(&config).await?,
		"file_status" => file_status_processing(&config).await?,
		other => error!("error in env (no such handler: {})!", other),
	}

	Ok(())
}
