pub mod create;
pub mod validation;

pub use self::create::*;
pub use self::validation::*;
