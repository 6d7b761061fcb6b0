//! Read-only systemd tools for unitchat.
//!
//! Four capabilities are offered to the model: the state of a unit, the tail
//! of its journal, its dependency graph, and the set of failed units. Unit
//! state comes from the systemd manager over D-Bus; journal lines come from
//! `journalctl`.

pub mod failed_units;
pub mod journal;
pub mod journal_logs;
pub mod systemd;
pub mod unit_dependencies;
pub mod unit_name;
pub mod unit_status;

use std::sync::Arc;
use unitchat_config::SystemdConfig;
use unitchat_core::error::ToolError;
use unitchat_core::tool::ToolRegistry;

pub use failed_units::FailedUnitsTool;
pub use journal::{JournalReader, Journalctl};
pub use journal_logs::JournalLogsTool;
pub use systemd::{DbusServiceManager, ServiceManager, SystemdError, UnitDependencies, UnitSummary};
pub use unit_dependencies::{DependencySummary, UnitDependenciesTool};
pub use unit_name::normalize_unit_name;
pub use unit_status::UnitStatusTool;

/// Build the registry of systemd tools over the given backends.
///
/// Registration order is the order the model sees the tools in.
pub fn build_registry(
    manager: Arc<dyn ServiceManager>,
    journal: Arc<dyn JournalReader>,
    config: &SystemdConfig,
) -> Result<ToolRegistry, ToolError> {
    let suffix = config.default_unit_suffix.as_str();
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(UnitStatusTool::new(manager.clone(), suffix)))?;
    registry.register(Box::new(JournalLogsTool::new(
        journal,
        suffix,
        config.default_log_lines,
    )))?;
    registry.register(Box::new(UnitDependenciesTool::new(manager.clone(), suffix)))?;
    registry.register(Box::new(FailedUnitsTool::new(manager)))?;
    Ok(registry)
}

/// Registry backed by the system bus and the configured `journalctl`.
pub fn default_registry(config: &SystemdConfig) -> Result<ToolRegistry, ToolError> {
    build_registry(
        Arc::new(DbusServiceManager::new()),
        Arc::new(Journalctl::new(&config.journalctl_path)),
        config,
    )
}
