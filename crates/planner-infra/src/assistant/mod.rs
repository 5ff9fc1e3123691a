//! Assistant implementations.

mod gemini;
mod prompts;

pub use gemini::{GeminiAssistant, GeminiConfig};
