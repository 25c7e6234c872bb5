//! LLM provider implementations
//!
//! Concrete [`AssistantGateway`](crate::AssistantGateway) implementations
//! backed by hosted model APIs.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig, GeminiGateway};
