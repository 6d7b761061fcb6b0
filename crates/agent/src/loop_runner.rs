//! The agent reasoning loop implementation.

use std::sync::Arc;
use std::time::Instant;
use futures::future::join_all;
use tracing::{debug, error, info, warn};
use unitchat_core::error::ToolError;
use unitchat_core::event::{DomainEvent, EventBus};
use unitchat_core::message::{AssistantMessage, Message, ToolCall};
use unitchat_core::provider::{Provider, ProviderRequest};
use unitchat_core::tool::ToolRegistry;
use uuid::Uuid;

/// Model invocations allowed per turn unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// The model answered without requesting any tools
    Completed,
    /// The iteration cap was hit while the model was still requesting tools
    Capped,
}

/// The result of one user turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The last assistant message. When capped it still carries tool calls.
    pub message: AssistantMessage,
    pub status: TurnStatus,
    /// Number of model invocations made
    pub model_calls: u32,
    /// The working transcript: the input history plus everything the turn added
    pub transcript: Vec<Message>,
}

impl TurnOutcome {
    pub fn is_capped(&self) -> bool {
        self.status == TurnStatus::Capped
    }
}

/// The core agent loop that orchestrates LLM calls and tool execution.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Maximum model invocations per turn
    max_iterations: u32,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            event_bus,
        }
    }

    /// Set the maximum number of model invocations per turn. Values below 1 are raised to 1.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Run one user turn.
    ///
    /// `history` is copied into a working transcript; the caller's history is
    /// never touched. The loop calls the model, runs every requested tool,
    /// appends the assistant message followed by one result per call (in
    /// request order), and repeats until the model requests no tools or
    /// `max_iterations` model calls have been made.
    ///
    /// Tool faults and unknown tools become error results for the model.
    /// Only provider failures end the turn with an `Err`.
    pub async fn run_turn(&self, history: &[Message]) -> unitchat_core::Result<TurnOutcome> {
        let turn_id = Uuid::new_v4();
        info!(
            turn_id = %turn_id,
            messages = history.len(),
            max_iterations = self.max_iterations,
            "Processing turn"
        );

        let mut working = history.to_vec();
        let tool_definitions = self.tools.definitions();
        let mut model_calls = 0;

        loop {
            model_calls += 1;
            debug!(turn_id = %turn_id, iteration = model_calls, "Agent loop iteration");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: working.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: chrono::Utc::now(),
                });
            }

            let message = response.message;
            if message.is_terminal() {
                debug!(turn_id = %turn_id, model_calls, "Model returned a final answer");
                working.push(Message::Assistant(message.clone()));
                return Ok(TurnOutcome {
                    message,
                    status: TurnStatus::Completed,
                    model_calls,
                    transcript: working,
                });
            }

            debug!(
                turn_id = %turn_id,
                tool_count = message.tool_calls.len(),
                "Executing tool calls"
            );
            self.event_bus.publish(DomainEvent::ToolCallsRequested {
                iteration: model_calls,
                calls: message.tool_calls.clone(),
                timestamp: chrono::Utc::now(),
            });

            // Results are folded only once the whole round has finished
            let results = self.dispatch(&message.tool_calls).await;
            working.push(Message::Assistant(message.clone()));
            working.extend(results);

            if model_calls >= self.max_iterations {
                warn!(
                    turn_id = %turn_id,
                    max_iterations = self.max_iterations,
                    "Reached maximum iterations; the model may not have finished"
                );
                self.event_bus.publish(DomainEvent::IterationCapReached {
                    max_iterations: self.max_iterations,
                    timestamp: chrono::Utc::now(),
                });
                return Ok(TurnOutcome {
                    message,
                    status: TurnStatus::Capped,
                    model_calls,
                    transcript: working,
                });
            }
        }
    }

    /// Run every call of one round concurrently. Results come back in call order.
    async fn dispatch(&self, calls: &[ToolCall]) -> Vec<Message> {
        join_all(calls.iter().map(|call| self.execute_call(call))).await
    }

    async fn execute_call(&self, call: &ToolCall) -> Message {
        let start = Instant::now();
        let result = self.tools.execute(call).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: call.name.clone(),
            success: result.is_ok(),
            duration_ms,
            timestamp: chrono::Utc::now(),
        });

        match result {
            Ok(output) => {
                debug!(tool = %call.name, call_id = %call.id, duration_ms, "Tool executed");
                Message::tool_result(&call.id, output)
            }
            Err(e @ ToolError::NotFound(_)) => {
                warn!(tool = %call.name, "Model requested an unregistered tool");
                Message::tool_error(&call.id, e.to_string())
            }
            Err(e) => {
                let unit_name = call
                    .arguments
                    .get("unit_name")
                    .and_then(|v| v.as_str());
                error!(tool = %call.name, unit_name = ?unit_name, error = %e, "Tool execution failed");
                Message::tool_error(&call.id, format!("Error: {e}"))
            }
        }
    }
}
