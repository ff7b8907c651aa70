/// Difficulty is stored as a free-form label. The admin form offers a
/// closed choice, but the store accepts anything non-empty.
pub const DEFAULT_DIFFICULTY: &str = "Medium";

pub const DIFFICULTY_CHOICES: &[&str] = &["Easy", "Medium", "Hard"];

/// Trims the submitted label, falling back to the default when empty.
pub fn normalize_difficulty(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        DEFAULT_DIFFICULTY.to_string()
    } else {
        trimmed.to_string()
    }
}
