//! Failed units tool — every unit whose `ActiveState` is `failed`.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use unitchat_core::error::ToolError;
use unitchat_core::message::ToolOutput;
use unitchat_core::tool::Tool;
use crate::systemd::ServiceManager;

const NAME: &str = "list_failed_units";

pub struct FailedUnitsTool {
    manager: Arc<dyn ServiceManager>,
}

#[derive(Debug, Serialize)]
struct FailedUnitsReport {
    failed_units: Vec<String>,
    count: usize,
    has_failures: bool,
    summary: String,
}

impl FailedUnitsReport {
    fn new(failed_units: Vec<String>) -> Self {
        let count = failed_units.len();
        let summary = if count == 0 {
            "No failed units found".to_string()
        } else {
            format!("Found {count} failed unit(s)")
        };
        Self {
            failed_units,
            count,
            has_failures: count > 0,
            summary,
        }
    }
}

impl FailedUnitsTool {
    pub fn new(manager: Arc<dyn ServiceManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for FailedUnitsTool {
    fn name(&self) -> &str { NAME }

    fn description(&self) -> &str {
        "Gets a list of failed systemd units."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let units = self
            .manager
            .list_units()
            .await
            .map_err(|e| e.into_tool_error(NAME))?;

        let failed = units
            .into_iter()
            .filter(|u| u.is_failed())
            .map(|u| u.name)
            .collect();

        let value = serde_json::to_value(FailedUnitsReport::new(failed)).map_err(|e| {
            ToolError::ExecutionFailed {
                tool_name: NAME.into(),
                reason: e.to_string(),
            }
        })?;
        Ok(ToolOutput::Structured(value))
    }
}
