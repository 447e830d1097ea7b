pub mod document;
pub mod generation;
pub mod id;
pub mod payment;
pub mod search;
pub mod slide;
pub mod templates;
pub mod user;

pub use self::document::*;
pub use self::generation::*;
pub use self::id::*;
pub use self::payment::*;
pub use self::search::*;
pub use self::slide::*;
pub use self::templates::*;
pub use self::user::*;
