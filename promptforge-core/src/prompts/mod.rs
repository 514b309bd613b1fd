//! Prompt construction shared by every provider adapter

pub mod templates;

pub use templates::{AppCategory, LabelParseError, PromptTemplateBuilder, Verbosity};

/// Separator placed between the system instruction and the user's description
/// for providers without a dedicated system slot
pub const USER_REQUEST_SEPARATOR: &str = "\n\nUser Request: ";

/// Merge the instruction and the description into a single user message
pub fn merge_instruction(system_instruction: &str, description: &str) -> String {
    format!("{system_instruction}{USER_REQUEST_SEPARATOR}{description}")
}
