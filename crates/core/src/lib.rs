//! # unitchat core
//!
//! Domain types, traits, and error definitions shared by every unitchat crate.
//! This crate carries no transport code: the model backend, the systemd
//! capabilities and the terminal front end all implement against the traits
//! defined here.
//!
//! ## Layout
//!
//! - [`message`]: the transcript (`Message`, `AssistantMessage`, `ToolCall`, `ToolOutput`)
//! - [`tool`]: the `Tool` trait and the ordered, immutable `ToolRegistry`
//! - [`provider`]: the `Provider` trait used to invoke the language model
//! - [`event`]: domain events published while a turn runs
//! - [`error`]: error enums per bounded context

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{AssistantMessage, Message, ToolCall, ToolOutput};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolRegistry, parse_arguments};
