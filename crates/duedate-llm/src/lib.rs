//! LLM-backed validity-period extraction.

pub mod client;
pub mod prompt;

pub use client::{LlmConfig, LlmError, LlmExtractor};
