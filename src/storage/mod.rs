pub mod detail_cache;
pub mod documents;
pub mod image_cache;
pub mod kv;
pub mod session_store;

pub use self::detail_cache::*;
pub use self::documents::*;
pub use self::image_cache::*;
pub use self::kv::*;
pub use self::session_store::*;
