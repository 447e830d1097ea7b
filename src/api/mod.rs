pub mod auth;
pub mod client;
pub mod generation;
pub mod media;
pub mod payment;
pub mod search;

pub use self::client::*;
pub use self::media::upload_percent;
pub use self::search::*;
