mod difficulty;
mod error;
mod suggest;

pub use difficulty::{DEFAULT_DIFFICULTY, DIFFICULTY_CHOICES, normalize_difficulty};
pub use error::DomainError;
pub use suggest::suggest;
