pub mod faq;
pub mod navigator;
pub mod notifier;

pub use self::faq::*;
pub use self::navigator::*;
pub use self::notifier::*;
