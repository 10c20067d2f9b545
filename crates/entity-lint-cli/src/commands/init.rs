//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# entity-lint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from source discovery
exclude = [
    "**/bin/**",
    "**/obj/**",
]

# Respect .gitignore files
respect_gitignore = true

[scope]
# Generic base classes marking a domain entity when they are not part of the
# analysed sources. Self-constrained bases (`Base<T> where T : Base<T>`)
# declared in the sources are recognised without being listed here.
entity_markers = ["EntityBase"]
aggregate_root_interface = "IAggregateRoot"
entity_interface = "IEntity"

# Rules can be disabled by name or code.
# Run `entity-lint list-rules` for the catalog.

# [rules.DE028_NoAsyncMembers]
# enabled = false

# [rules.DE051]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("entity-lint.toml"), force)?;

    println!("Created entity-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit entity-lint.toml to match your entity base class and marker interfaces");
    println!("  2. Run: entity-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn existing_config_requires_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("entity-lint.toml");
        std::fs::write(&path, "# mine").unwrap();

        let err = write_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
