//! `unitchat tools` — List the tools offered to the model.

use std::path::Path;
use unitchat_config::AppConfig;

pub fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_with_overrides(config_path)
        .map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = unitchat_tools::default_registry(&config.systemd)?;

    println!("Tools offered to the model ({}):\n", registry.len());
    for def in registry.definitions() {
        println!("  {}", def.name);
        println!("      {}", def.description);
        for param in describe_parameters(&def.parameters) {
            println!("      - {param}");
        }
        println!();
    }

    println!(
        "Bare unit names get '.{}' appended; journal tails default to {} lines.",
        config.systemd.default_unit_suffix, config.systemd.default_log_lines
    );
    Ok(())
}

/// One line per parameter: `name: type` plus `(required)` when the schema lists it.
fn describe_parameters(schema: &serde_json::Value) -> Vec<String> {
    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
        .unwrap_or_default();

    let Some(properties) = schema["properties"].as_object() else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, prop)| {
            let kind = prop["type"].as_str().unwrap_or("any");
            if required.contains(&name.as_str()) {
                format!("{name}: {kind} (required)")
            } else {
                format!("{name}: {kind}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_required_and_optional_parameters() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "unit_name": { "type": "string" },
                "lines": { "type": "integer" }
            },
            "required": ["unit_name"]
        });
        let mut lines = describe_parameters(&schema);
        lines.sort();
        assert_eq!(lines, vec!["lines: integer", "unit_name: string (required)"]);
    }

    #[test]
    fn no_properties_means_no_lines() {
        let schema = serde_json::json!({ "type": "object", "properties": {} });
        assert!(describe_parameters(&schema).is_empty());
    }
}
