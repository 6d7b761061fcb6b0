//! `unitchat chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use unitchat_agent::{AgentLoop, TurnOutcome};
use unitchat_config::AppConfig;
use unitchat_core::event::{DomainEvent, EventBus};
use unitchat_core::message::Message;
use crate::terminal::{self, Input};

const GOODBYE: &str = "Exiting chat. Goodbye!";

pub async fn run(config_path: &Path, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_with_overrides(config_path)
        .map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    if !config.has_api_key() && config.default_provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured for provider '{}'!", config.default_provider);
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export OPENAI_API_KEY=sk-...");
        eprintln!("    export OPENROUTER_API_KEY=sk-or-v1-...");
        eprintln!("    export UNITCHAT_API_KEY=...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", config_path.display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = unitchat_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let tools = Arc::new(unitchat_tools::default_registry(&config.systemd)?);

    let event_bus = Arc::new(EventBus::default());
    let mut events = event_bus.subscribe();
    let agent = AgentLoop::new(
        provider,
        config.model(),
        config.default_temperature,
        tools,
        event_bus,
    )
    .with_max_tokens(config.default_max_tokens)
    .with_max_iterations(config.agent.max_iterations);

    let mut history = Vec::new();
    if let Some(prompt) = &config.system_prompt {
        history.push(Message::system(prompt));
    }

    if let Some(msg) = message {
        // Single message mode
        history.push(Message::user(msg));
        match take_turn(&agent, &mut events, &history).await {
            Some(outcome) => println!("LLM: {}", outcome?.message.content),
            None => println!("\n{GOODBYE}"),
        }
        return Ok(());
    }

    // Interactive mode
    println!("Welcome to the systemd-enabled LLM chat. Type 'exit' or 'quit' to end.");
    let mut input = terminal::stdin();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let next = tokio::select! {
            next = input.recv() => next,
            _ = tokio::signal::ctrl_c() => None,
        };

        let line = match next {
            Some(Ok(Input::Line(line))) => line,
            Some(Ok(Input::Quit)) => {
                println!("{GOODBYE}");
                break;
            }
            Some(Err(e)) => {
                eprintln!("\nError reading input: {e}");
                println!("{GOODBYE}");
                break;
            }
            None => {
                println!("\n{GOODBYE}");
                break;
            }
        };

        history.push(Message::user(line));

        match take_turn(&agent, &mut events, &history).await {
            Some(Ok(outcome)) => {
                println!("LLM: {}\n", outcome.message.content);
                history = outcome.transcript;
            }
            Some(Err(e)) => {
                eprintln!("Error: {e}\n");
                // Forget the question so the next turn starts from a consistent history
                history.pop();
            }
            None => {
                println!("\n{GOODBYE}");
                break;
            }
        }
    }

    Ok(())
}

/// Run one turn, printing tool activity as it happens. `None` if interrupted.
async fn take_turn(
    agent: &AgentLoop,
    events: &mut broadcast::Receiver<Arc<DomainEvent>>,
    history: &[Message],
) -> Option<unitchat_core::Result<TurnOutcome>> {
    let turn = agent.run_turn(history);
    tokio::pin!(turn);

    let result = loop {
        tokio::select! {
            biased;
            Ok(event) = events.recv() => print_event(&event),
            result = &mut turn => break Some(result),
            _ = tokio::signal::ctrl_c() => break None,
        }
    };

    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }
    result
}

fn print_event(event: &DomainEvent) {
    if let Some(text) = render_event(event) {
        println!("{text}");
    }
}

/// Operator-facing text for an event, if it should be shown.
fn render_event(event: &DomainEvent) -> Option<String> {
    match event {
        DomainEvent::ToolCallsRequested { iteration, calls, .. } => {
            let mut text = format!("\nTool Calls (iteration {iteration}):");
            for call in calls {
                text.push_str(&format!("\n  - {}({})", call.name, call.arguments));
            }
            Some(text)
        }
        DomainEvent::IterationCapReached { max_iterations, .. } => Some(format!(
            "\nWarning: Reached maximum iterations ({max_iterations}). Final response may contain unexecuted tool calls."
        )),
        DomainEvent::ToolExecuted { .. } | DomainEvent::ResponseGenerated { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitchat_core::message::ToolCall;

    #[test]
    fn tool_calls_are_listed_per_iteration() {
        let event = DomainEvent::ToolCallsRequested {
            iteration: 2,
            calls: vec![
                ToolCall::new("c1", "get_unit_status", serde_json::json!({"unit_name": "nginx"})),
                ToolCall::new("c2", "list_failed_units", serde_json::json!({})),
            ],
            timestamp: chrono::Utc::now(),
        };
        let text = render_event(&event).unwrap();
        assert_eq!(
            text,
            "\nTool Calls (iteration 2):\n  - get_unit_status({\"unit_name\":\"nginx\"})\n  - list_failed_units({})"
        );
    }

    #[test]
    fn cap_warning_names_the_limit() {
        let event = DomainEvent::IterationCapReached {
            max_iterations: 10,
            timestamp: chrono::Utc::now(),
        };
        assert!(render_event(&event).unwrap().contains("Reached maximum iterations (10)"));
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        let event = DomainEvent::ToolExecuted {
            tool_name: "get_unit_status".into(),
            success: true,
            duration_ms: 3,
            timestamp: chrono::Utc::now(),
        };
        assert!(render_event(&event).is_none());
    }
}
