//! TOML configuration loading for the headless shell.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tower_defense_core::Config;

/// Loads the configuration file, or the stock balance when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Renders the stock configuration as a TOML document.
pub(crate) fn render_default() -> Result<String> {
    toml::to_string_pretty(&Config::default()).context("failed to render default configuration")
}

fn parse(contents: &str) -> Result<Config> {
    toml::from_str(contents).context("failed to parse configuration toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load(None).expect("defaults load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_overrides_only_named_values() {
        let config = parse("[economy]\nstarting_money = 500\n\n[waves]\npregame_ticks = 0\n")
            .expect("config parses");

        assert_eq!(config.economy.starting_money, 500);
        assert_eq!(config.economy.starting_lives, 20);
        assert_eq!(config.waves.pregame_ticks, 0);
        assert_eq!(config.path, Config::default().path);
    }

    #[test]
    fn rendered_defaults_parse_back() {
        let rendered = render_default().expect("defaults render");
        assert!(rendered.contains("[economy]"));
        assert_eq!(parse(&rendered).expect("rendered config parses"), Config::default());
    }

    #[test]
    fn malformed_file_reports_context() {
        let error = parse("[grid]\ncolumns = \"wide\"\n").unwrap_err();
        assert!(format!("{error:#}").contains("failed to parse configuration"));
    }
}
