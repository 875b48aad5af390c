//! Prompt templates for decision requests

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};
