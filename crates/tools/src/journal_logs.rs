//! Journal logs tool — the last N journal lines of a unit.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use unitchat_core::error::ToolError;
use unitchat_core::message::ToolOutput;
use unitchat_core::tool::{Tool, parse_arguments};
use crate::journal::JournalReader;
use crate::unit_name::{normalize_unit_name, suffix_hint};

const NAME: &str = "get_journal_logs";

pub struct JournalLogsTool {
    journal: Arc<dyn JournalReader>,
    default_suffix: String,
    description: String,
    default_lines: u32,
}

#[derive(Debug, Deserialize)]
struct Args {
    unit_name: String,
    #[serde(default)]
    lines: Option<u32>,
}

impl JournalLogsTool {
    pub fn new(
        journal: Arc<dyn JournalReader>,
        default_suffix: impl Into<String>,
        default_lines: u32,
    ) -> Self {
        let default_suffix = default_suffix.into();
        Self {
            journal,
            description: format!(
                "Gets the last N lines of the journal for a systemd unit. {}",
                suffix_hint(&default_suffix)
            ),
            default_suffix,
            default_lines,
        }
    }
}

#[async_trait]
impl Tool for JournalLogsTool {
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
                    "description": "Unit name, e.g. 'nginx' or 'cron.service'"
                },
                "lines": {
                    "type": "integer",
                    "minimum": 1,
                    "default": self.default_lines,
                    "description": "Number of trailing journal lines to return"
                }
            },
            "required": ["unit_name"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: Args = parse_arguments(arguments)?;
        let unit = normalize_unit_name(&args.unit_name, &self.default_suffix);
        let lines = match args.lines {
            Some(0) => {
                return Err(ToolError::InvalidArguments("'lines' must be at least 1".into()));
            }
            Some(n) => n,
            None => self.default_lines,
        };

        let logs = self
            .journal
            .tail(&unit, lines)
            .await
            .map_err(|e| e.into_tool_error(NAME))?;
        Ok(ToolOutput::Text(logs))
    }
}
