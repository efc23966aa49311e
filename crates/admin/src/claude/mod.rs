//! Claude API integration for the AI reports.
//!
//! A thin client over the Anthropic Messages API plus the tools the report
//! prompts may call. Prompt orchestration lives in [`crate::ai`].

mod client;
mod error;
pub mod tools;
mod types;

pub use client::ClaudeClient;
pub use error::ClaudeError;
pub use tools::{ANALYTICS_TOOL, ToolExecutor, analytics_tool};
pub use types::{ChatRequest, ChatResponse, ContentBlock, Message, MessageContent, StopReason, Tool, Usage};
