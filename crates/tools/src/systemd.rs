//! systemd manager access over D-Bus.
//!
//! The tools talk to systemd through the [`ServiceManager`] trait so they can
//! be exercised against a fake manager in tests. [`DbusServiceManager`] is the
//! real implementation on the system bus.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use unitchat_core::error::ToolError;
use zbus::Connection;
use zbus::zvariant::OwnedObjectPath;

const SYSTEMD_DESTINATION: &str = "org.freedesktop.systemd1";
const SYSTEMD_PATH: &str = "/org/freedesktop/systemd1";
const MANAGER_INTERFACE: &str = "org.freedesktop.systemd1.Manager";
const UNIT_INTERFACE: &str = "org.freedesktop.systemd1.Unit";

/// Errors talking to systemd or the journal.
#[derive(Debug, Error)]
pub enum SystemdError {
    #[error("Unit {0} not loaded")]
    UnitNotFound(String),

    #[error("D-Bus error: {0}")]
    Bus(String),

    #[error("`journalctl` command not found. Please ensure it is installed and in the system's PATH.")]
    JournalctlMissing,

    #[error("Error getting journal logs for {unit}: {stderr}")]
    Journal { unit: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SystemdError {
    /// Wrap this error as an execution failure of `tool_name`.
    pub fn into_tool_error(self, tool_name: &str) -> ToolError {
        ToolError::ExecutionFailed {
            tool_name: tool_name.to_string(),
            reason: self.to_string(),
        }
    }
}

impl From<zbus::Error> for SystemdError {
    fn from(err: zbus::Error) -> Self {
        Self::Bus(err.to_string())
    }
}

/// Dependency properties of one unit, as systemd reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitDependencies {
    pub requires: Vec<String>,
    pub wants: Vec<String>,
    pub after: Vec<String>,
    pub before: Vec<String>,
    pub required_by: Vec<String>,
    pub wanted_by: Vec<String>,
}

/// One row of the manager's unit listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    pub name: String,
    pub description: String,
    pub load_state: String,
    pub active_state: String,
    pub sub_state: String,
}

impl UnitSummary {
    pub fn is_failed(&self) -> bool {
        self.active_state == "failed"
    }
}

/// Read-only view of the systemd manager.
///
/// Unit names passed in are already normalized.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// The unit's `ActiveState` ("active", "inactive", "failed", ...).
    async fn active_state(&self, unit: &str) -> Result<String, SystemdError>;

    /// Forward and reverse dependency lists of the unit.
    async fn unit_dependencies(&self, unit: &str) -> Result<UnitDependencies, SystemdError>;

    /// Every unit currently loaded by the manager.
    async fn list_units(&self) -> Result<Vec<UnitSummary>, SystemdError>;
}

/// `ListUnits` row: (name, description, load, active, sub, following, path, job id, job type, job path)
type ListUnitsRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    OwnedObjectPath,
    u32,
    String,
    OwnedObjectPath,
);

/// [`ServiceManager`] backed by `org.freedesktop.systemd1` on the system bus.
///
/// A fresh connection is opened per query; queries are rare and short.
#[derive(Debug, Default, Clone)]
pub struct DbusServiceManager;

impl DbusServiceManager {
    pub fn new() -> Self {
        Self
    }

    async fn manager_proxy(connection: &Connection) -> Result<zbus::Proxy<'static>, SystemdError> {
        Ok(zbus::Proxy::new(connection, SYSTEMD_DESTINATION, SYSTEMD_PATH, MANAGER_INTERFACE).await?)
    }

    async fn unit_path(connection: &Connection, unit: &str) -> Result<OwnedObjectPath, SystemdError> {
        let manager = Self::manager_proxy(connection).await?;
        manager
            .call("GetUnit", &(unit,))
            .await
            .map_err(|err| {
                let no_such_unit = matches!(
                    &err,
                    zbus::Error::MethodError(name, _, _)
                        if name.as_str() == "org.freedesktop.systemd1.NoSuchUnit"
                );
                if no_such_unit {
                    SystemdError::UnitNotFound(unit.to_string())
                } else {
                    SystemdError::from(err)
                }
            })
    }

    async fn list_property(proxy: &zbus::Proxy<'_>, property: &str) -> Result<Vec<String>, SystemdError> {
        Ok(proxy.get_property::<Vec<String>>(property).await?)
    }
}

#[async_trait]
impl ServiceManager for DbusServiceManager {
    async fn active_state(&self, unit: &str) -> Result<String, SystemdError> {
        let connection = Connection::system().await?;
        let unit_path = Self::unit_path(&connection, unit).await?;
        let unit_proxy =
            zbus::Proxy::new(&connection, SYSTEMD_DESTINATION, unit_path.as_str(), UNIT_INTERFACE)
                .await?;

        let active_state: String = unit_proxy.get_property("ActiveState").await?;
        debug!(unit, active_state = %active_state, "Queried unit state");
        Ok(active_state)
    }

    async fn unit_dependencies(&self, unit: &str) -> Result<UnitDependencies, SystemdError> {
        let connection = Connection::system().await?;
        let unit_path = Self::unit_path(&connection, unit).await?;
        let unit_proxy =
            zbus::Proxy::new(&connection, SYSTEMD_DESTINATION, unit_path.as_str(), UNIT_INTERFACE)
                .await?;

        Ok(UnitDependencies {
            requires: Self::list_property(&unit_proxy, "Requires").await?,
            wants: Self::list_property(&unit_proxy, "Wants").await?,
            after: Self::list_property(&unit_proxy, "After").await?,
            before: Self::list_property(&unit_proxy, "Before").await?,
            required_by: Self::list_property(&unit_proxy, "RequiredBy").await?,
            wanted_by: Self::list_property(&unit_proxy, "WantedBy").await?,
        })
    }

    async fn list_units(&self) -> Result<Vec<UnitSummary>, SystemdError> {
        let connection = Connection::system().await?;
        let manager = Self::manager_proxy(&connection).await?;
        let rows: Vec<ListUnitsRow> = manager.call("ListUnits", &()).await?;

        Ok(rows
            .into_iter()
            .map(
                |(name, description, load_state, active_state, sub_state, ..)| UnitSummary {
                    name,
                    description,
                    load_state,
                    active_state,
                    sub_state,
                },
            )
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`ServiceManager`] for tests.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeServiceManager {
        pub states: HashMap<String, String>,
        pub dependencies: HashMap<String, UnitDependencies>,
        pub units: Vec<UnitSummary>,
        pub fail_with: Option<String>,
        /// Every unit name the manager was asked about, in call order
        pub queried: Mutex<Vec<String>>,
    }

    impl FakeServiceManager {
        pub fn with_state(mut self, unit: &str, state: &str) -> Self {
            self.states.insert(unit.into(), state.into());
            self
        }

        pub fn with_unit(mut self, name: &str, active_state: &str) -> Self {
            self.units.push(UnitSummary {
                name: name.into(),
                description: format!("{name} description"),
                load_state: "loaded".into(),
                active_state: active_state.into(),
                sub_state: if active_state == "active" { "running".into() } else { active_state.into() },
            });
            self
        }

        pub fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }

        fn record(&self, unit: &str) -> Result<(), SystemdError> {
            self.queried.lock().unwrap().push(unit.to_string());
            match &self.fail_with {
                Some(reason) => Err(SystemdError::Bus(reason.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ServiceManager for FakeServiceManager {
        async fn active_state(&self, unit: &str) -> Result<String, SystemdError> {
            self.record(unit)?;
            self.states
                .get(unit)
                .cloned()
                .ok_or_else(|| SystemdError::UnitNotFound(unit.to_string()))
        }

        async fn unit_dependencies(&self, unit: &str) -> Result<UnitDependencies, SystemdError> {
            self.record(unit)?;
            self.dependencies
                .get(unit)
                .cloned()
                .ok_or_else(|| SystemdError::UnitNotFound(unit.to_string()))
        }

        async fn list_units(&self) -> Result<Vec<UnitSummary>, SystemdError> {
            if let Some(reason) = &self.fail_with {
                return Err(SystemdError::Bus(reason.clone()));
            }
            Ok(self.units.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_detection_uses_active_state() {
        let unit = UnitSummary {
            name: "foo.service".into(),
            description: String::new(),
            load_state: "loaded".into(),
            active_state: "failed".into(),
            sub_state: "failed".into(),
        };
        assert!(unit.is_failed());
        assert!(!UnitSummary { active_state: "active".into(), ..unit }.is_failed());
    }

    #[test]
    fn systemd_error_maps_to_execution_failure() {
        let err = SystemdError::UnitNotFound("ghost.service".into()).into_tool_error("get_unit_status");
        match err {
            ToolError::ExecutionFailed { tool_name, reason } => {
                assert_eq!(tool_name, "get_unit_status");
                assert!(reason.contains("ghost.service"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
