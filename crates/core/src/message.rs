//! Transcript domain types.
//!
//! A turn flows as: operator line → `Message::User` → model → `Message::Assistant`
//! (possibly with tool calls) → one `Message::Tool` per call → model again, until
//! an assistant message arrives with no tool calls.

use serde::{Deserialize, Serialize};

/// A single entry in a transcript. Insertion order is the causal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Operator-configured instructions, placed first by the caller
    System { content: String },

    /// A line typed by the operator
    User { content: String },

    /// A model response
    Assistant(AssistantMessage),

    /// The result of exactly one tool call
    Tool {
        /// The `ToolCall::id` this result answers
        call_id: String,
        output: ToolOutput,
        /// Whether the output describes a failure (unknown tool, executor fault)
        #[serde(default)]
        is_error: bool,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// A terminal assistant message (no tool calls).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(AssistantMessage::text(content))
    }

    /// A successful tool result.
    pub fn tool_result(call_id: impl Into<String>, output: ToolOutput) -> Self {
        Self::Tool {
            call_id: call_id.into(),
            output,
            is_error: false,
        }
    }

    /// A failed tool result carrying a diagnostic for the model.
    pub fn tool_error(call_id: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::Tool {
            call_id: call_id.into(),
            output: ToolOutput::Text(diagnostic.into()),
            is_error: true,
        }
    }

    /// The assistant payload, if this is an assistant message.
    pub fn as_assistant(&self) -> Option<&AssistantMessage> {
        match self {
            Self::Assistant(msg) => Some(msg),
            _ => None,
        }
    }
}

/// A response produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Free text (may be empty when the model only requests tools)
    #[serde(default)]
    pub content: String,

    /// Requested tool calls, in the order the model listed them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }

    /// True when the model asked for nothing further.
    pub fn is_terminal(&self) -> bool {
        self.tool_calls.is_empty()
    }
}

/// A request from the model to run one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique within the response (matches the model's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// What a tool hands back: plain text or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Text(String),
    Structured(serde_json::Value),
}

impl ToolOutput {
    /// Render the payload the way it is sent to the model.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for ToolOutput {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}
