//! Unit dependencies tool — forward and reverse dependencies as structured data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use unitchat_core::error::ToolError;
use unitchat_core::message::ToolOutput;
use unitchat_core::tool::{Tool, parse_arguments};
use crate::systemd::{ServiceManager, UnitDependencies};
use crate::unit_name::{normalize_unit_name, suffix_hint};

const NAME: &str = "get_unit_dependencies";

pub struct UnitDependenciesTool {
    manager: Arc<dyn ServiceManager>,
    default_suffix: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Args {
    unit_name: String,
}

/// Counts derived from a unit's dependency lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencySummary {
    pub total_dependencies: usize,
    pub total_dependents: usize,
    pub has_hard_dependencies: bool,
    pub has_soft_dependencies: bool,
    pub has_dependents: bool,
}

impl DependencySummary {
    /// Ordering-only relations (After/Before) are not counted.
    pub fn of(deps: &UnitDependencies) -> Self {
        Self {
            total_dependencies: deps.requires.len() + deps.wants.len(),
            total_dependents: deps.required_by.len() + deps.wanted_by.len(),
            has_hard_dependencies: !deps.requires.is_empty(),
            has_soft_dependencies: !deps.wants.is_empty(),
            has_dependents: !deps.required_by.is_empty() || !deps.wanted_by.is_empty(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DependencyReport<'a> {
    unit_name: &'a str,
    dependencies: &'a UnitDependencies,
    summary: DependencySummary,
}

impl UnitDependenciesTool {
    pub fn new(manager: Arc<dyn ServiceManager>, default_suffix: impl Into<String>) -> Self {
        let default_suffix = default_suffix.into();
        Self {
            manager,
            description: format!(
                "Gets the dependency information of a systemd unit via D-Bus as structured data. {}",
                suffix_hint(&default_suffix)
            ),
            default_suffix,
        }
    }
}

#[async_trait]
impl Tool for UnitDependenciesTool {
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
                    "description": "Unit name, e.g. 'nginx' or 'multi-user.target'"
                }
            },
            "required": ["unit_name"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: Args = parse_arguments(arguments)?;
        let unit = normalize_unit_name(&args.unit_name, &self.default_suffix);

        let deps = self
            .manager
            .unit_dependencies(&unit)
            .await
            .map_err(|e| e.into_tool_error(NAME))?;

        let report = DependencyReport {
            unit_name: &unit,
            dependencies: &deps,
            summary: DependencySummary::of(&deps),
        };
        let value = serde_json::to_value(&report).map_err(|e| ToolError::ExecutionFailed {
            tool_name: NAME.into(),
            reason: e.to_string(),
        })?;
        Ok(ToolOutput::Structured(value))
    }
}
