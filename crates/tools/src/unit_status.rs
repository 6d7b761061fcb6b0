//! Unit status tool — the `ActiveState` of one unit.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use unitchat_core::error::ToolError;
use unitchat_core::message::ToolOutput;
use unitchat_core::tool::{Tool, parse_arguments};
use crate::systemd::ServiceManager;
use crate::unit_name::{normalize_unit_name, suffix_hint};

const NAME: &str = "get_unit_status";

pub struct UnitStatusTool {
    manager: Arc<dyn ServiceManager>,
    default_suffix: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Args {
    unit_name: String,
}

impl UnitStatusTool {
    pub fn new(manager: Arc<dyn ServiceManager>, default_suffix: impl Into<String>) -> Self {
        let default_suffix = default_suffix.into();
        Self {
            manager,
            description: format!(
                "Gets the status of a single systemd unit. Wildcards are not supported. {}",
                suffix_hint(&default_suffix)
            ),
            default_suffix,
        }
    }
}

#[async_trait]
impl Tool for UnitStatusTool {
    fn name(&self) -> &str { NAME }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "unit_name": {
                    "type": "string",
                    "description": "Unit name, e.g. 'nginx' or 'sshd.socket'"
                }
            },
            "required": ["unit_name"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: Args = parse_arguments(arguments)?;
        let unit = normalize_unit_name(&args.unit_name, &self.default_suffix);

        let state = self
            .manager
            .active_state(&unit)
            .await
            .map_err(|e| e.into_tool_error(NAME))?;
        Ok(ToolOutput::Text(state))
    }
}
