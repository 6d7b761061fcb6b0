//! `unitchat doctor` — Diagnose configuration, provider and systemd access.

use std::path::Path;
use unitchat_config::AppConfig;
use unitchat_tools::{
    DbusServiceManager, JournalReader, Journalctl, ServiceManager, SystemdError, UnitSummary,
};

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 unitchat Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    // Check config
    let config = if config_path.exists() {
        match AppConfig::load_with_overrides(config_path) {
            Ok(config) => {
                println!("  ✅ Config file valid: {}", config_path.display());
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                println!("\n  ⚠️  Fix the config file before running other checks.");
                return Ok(());
            }
        }
    } else {
        println!("  ⚠️  No config file — using defaults (run `unitchat init`)");
        AppConfig::load_with_overrides(config_path)?
    };

    println!("  ✅ Provider: {} (model {})", config.default_provider, config.model());

    // Check API key
    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else if config.default_provider == "ollama" {
        println!("  ✅ No API key needed for ollama");
    } else {
        println!("  ❌ No API key — set OPENAI_API_KEY or add api_key to the config");
        issues += 1;
    }

    // Check the provider answers
    let router = unitchat_providers::build_from_config(&config);
    match router.default() {
        Some(provider) => match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider reachable"),
            Ok(false) => {
                println!("  ⚠️  Provider responded but reported unhealthy");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider unreachable: {e}");
                issues += 1;
            }
        },
        None => {
            println!("  ❌ No default provider configured");
            issues += 1;
        }
    }

    // Check the systemd manager on the system bus
    match DbusServiceManager::new().list_units().await {
        Ok(units) => {
            let failed: Vec<&UnitSummary> = units.iter().filter(|u| u.is_failed()).collect();
            println!(
                "  ✅ systemd reachable over D-Bus ({} units, {} failed)",
                units.len(),
                failed.len()
            );
            for unit in failed {
                println!("     - {}", describe_unit(unit));
            }
        }
        Err(e) => {
            println!("  ❌ Cannot query systemd over D-Bus: {e}");
            issues += 1;
        }
    }

    // Check journalctl
    let journal = Journalctl::new(&config.systemd.journalctl_path);
    match journal.tail("systemd-journald.service", 1).await {
        Ok(_) => println!("  ✅ journalctl available"),
        Err(SystemdError::JournalctlMissing) => {
            println!("  ❌ journalctl not found at '{}'", config.systemd.journalctl_path);
            issues += 1;
        }
        Err(e) => {
            println!("  ⚠️  journalctl found but failed: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// One-line rendering of a unit listing row.
fn describe_unit(unit: &UnitSummary) -> String {
    let line = format!(
        "{} ({}, {}/{})",
        unit.name, unit.load_state, unit.active_state, unit.sub_state
    );
    if unit.description.is_empty() {
        line
    } else {
        format!("{line}: {}", unit.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(description: &str) -> UnitSummary {
        UnitSummary {
            name: "backup.service".into(),
            description: description.into(),
            load_state: "loaded".into(),
            active_state: "failed".into(),
            sub_state: "failed".into(),
        }
    }

    #[test]
    fn failed_unit_line_shows_states_and_description() {
        assert_eq!(
            describe_unit(&unit("Nightly backup")),
            "backup.service (loaded, failed/failed): Nightly backup"
        );
    }

    #[test]
    fn empty_description_is_omitted() {
        assert_eq!(describe_unit(&unit("")), "backup.service (loaded, failed/failed)");
    }

    #[test]
    fn not_found_load_state_is_visible() {
        let mut summary = unit("");
        summary.load_state = "not-found".into();
        summary.sub_state = "dead".into();
        assert_eq!(describe_unit(&summary), "backup.service (not-found, failed/dead)");
    }
}
