pub mod editor;
pub mod generation_watcher;
pub mod once_guard;
pub mod payment_flow;
pub mod polling;
pub mod session;

pub use self::editor::*;
pub use self::generation_watcher::*;
pub use self::once_guard::*;
pub use self::payment_flow::*;
pub use self::polling::*;
pub use self::session::*;
