//! Google Gemini provider implementation
//!
//! Structured-output calls against the `generateContent` endpoint.

pub mod client;
pub mod gateway;
pub mod types;

pub use client::{GeminiClient, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use gateway::GeminiGateway;
