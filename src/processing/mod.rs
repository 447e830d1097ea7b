pub mod file_status_processing;
pub mod session_processing;
pub mod sitemap_processing;

pub use self::file_status_processing::*;
pub use self::session_processing::*;
pub use self::sitemap_processing::*;
