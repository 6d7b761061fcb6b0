//! `unitchat init` — Write a default config file.

use std::path::Path;
use unitchat_config::AppConfig;

#[derive(Debug, PartialEq, Eq)]
enum InitOutcome {
    Created,
    Overwritten,
    Kept,
}

pub fn run(config_path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    match write_default_config(config_path, force)? {
        InitOutcome::Created => println!("✅ Created config at: {}", config_path.display()),
        InitOutcome::Overwritten => println!("✅ Overwrote config at: {}", config_path.display()),
        InitOutcome::Kept => {
            println!("⚠️  Config already exists at: {}", config_path.display());
            println!("   Edit it manually or re-run with --force.");
            return Ok(());
        }
    }

    println!("\n📝 Next steps:");
    println!("   1. Add your API key to {} (or export OPENAI_API_KEY)", config_path.display());
    println!("   2. Run: unitchat doctor");
    println!("   3. Run: unitchat chat");
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> std::io::Result<InitOutcome> {
    let existed = path.exists();
    if existed && !force {
        return Ok(InitOutcome::Kept);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;

    Ok(if existed { InitOutcome::Overwritten } else { InitOutcome::Created })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories_and_a_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(write_default_config(&path, false).unwrap(), InitOutcome::Created);
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.agent.max_iterations, 10);
    }

    #[test]
    fn existing_config_is_kept_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_model = \"custom\"\n").unwrap();

        assert_eq!(write_default_config(&path, false).unwrap(), InitOutcome::Kept);
        assert!(std::fs::read_to_string(&path).unwrap().contains("custom"));

        assert_eq!(write_default_config(&path, true).unwrap(), InitOutcome::Overwritten);
        assert!(!std::fs::read_to_string(&path).unwrap().contains("custom"));
    }
}
