mod core;
pub mod models;
pub mod reflow;

pub use self::core::*;
pub use self::models::Transcript;
pub use self::reflow::reflow;
