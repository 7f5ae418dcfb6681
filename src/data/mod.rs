mod loader;
mod permute;

pub use loader::{LoadError, QuestionBank};
pub use permute::shuffle;
