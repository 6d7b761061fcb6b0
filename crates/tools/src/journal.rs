//! Journal access through the `journalctl` binary.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;
use crate::systemd::SystemdError;

/// Reads the tail of a unit's journal.
#[async_trait]
pub trait JournalReader: Send + Sync {
    /// Last `lines` journal lines of `unit` (already normalized).
    async fn tail(&self, unit: &str, lines: u32) -> Result<String, SystemdError>;
}

/// [`JournalReader`] that shells out to `journalctl -u <unit> -n <lines> --no-pager`.
#[derive(Debug, Clone)]
pub struct Journalctl {
    binary: PathBuf,
}

impl Journalctl {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn args(unit: &str, lines: u32) -> Vec<String> {
        vec![
            "-u".into(),
            unit.into(),
            "-n".into(),
            lines.to_string(),
            "--no-pager".into(),
        ]
    }
}

impl Default for Journalctl {
    fn default() -> Self {
        Self::new("journalctl")
    }
}

#[async_trait]
impl JournalReader for Journalctl {
    async fn tail(&self, unit: &str, lines: u32) -> Result<String, SystemdError> {
        debug!(unit, lines, binary = %self.binary.display(), "Reading journal");

        let output = Command::new(&self.binary)
            .args(Self::args(unit, lines))
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SystemdError::JournalctlMissing,
                _ => SystemdError::Io(e),
            })?;

        if !output.status.success() {
            return Err(SystemdError::Journal {
                unit: unit.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Canned [`JournalReader`] for tests.

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeJournal {
        pub output: String,
        pub fail_with: Option<String>,
        /// (unit, lines) of every request
        pub requests: Mutex<Vec<(String, u32)>>,
    }

    impl FakeJournal {
        pub fn returning(output: &str) -> Self {
            Self {
                output: output.into(),
                ..Self::default()
            }
        }

        pub fn requests(&self) -> Vec<(String, u32)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JournalReader for FakeJournal {
        async fn tail(&self, unit: &str, lines: u32) -> Result<String, SystemdError> {
            self.requests.lock().unwrap().push((unit.to_string(), lines));
            match &self.fail_with {
                Some(stderr) => Err(SystemdError::Journal {
                    unit: unit.to_string(),
                    stderr: stderr.clone(),
                }),
                None => Ok(self.output.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_journalctl_arguments() {
        assert_eq!(
            Journalctl::args("nginx.service", 25),
            vec!["-u", "nginx.service", "-n", "25", "--no-pager"]
        );
    }

    #[tokio::test]
    async fn missing_binary_is_reported() {
        let journal = Journalctl::new("/nonexistent/bin/journalctl-unitchat");
        let err = journal.tail("nginx.service", 10).await.unwrap_err();
        assert!(matches!(err, SystemdError::JournalctlMissing));
        assert!(err.to_string().contains("command not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        // `false` ignores its arguments and exits 1 with empty stderr
        let journal = Journalctl::new("false");
        let err = journal.tail("nginx.service", 10).await.unwrap_err();
        assert!(matches!(err, SystemdError::Journal { ref unit, .. } if unit == "nginx.service"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_is_trimmed() {
        // `echo` prints its arguments, standing in for journal output
        let journal = Journalctl::new("echo");
        let out = journal.tail("cron.service", 3).await.unwrap();
        assert!(out.contains("cron.service"));
        assert!(!out.ends_with('\n'));
    }
}
