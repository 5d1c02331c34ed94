use anyhow::Context;
use tt_domain::config::{Config, ConfigError, ConfigSeverity};

/// Run the config checks and print a report to stdout.
///
/// Warnings alone do not fail validation; returns `true` when the
/// config has no errors.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();
    if issues.is_empty() {
        println!("{config_path}: OK");
        return true;
    }

    let (errors, warnings): (Vec<ConfigError>, Vec<ConfigError>) = issues
        .into_iter()
        .partition(|i| i.severity == ConfigSeverity::Error);

    println!("{config_path}:");
    for issue in errors.iter().chain(warnings.iter()) {
        println!("  {issue}");
    }
    println!();
    println!("{} error(s), {} warning(s)", errors.len(), warnings.len());

    errors.is_empty()
}

/// Print the resolved config, defaults filled in, as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("rendering config as TOML")?;
    print!("{rendered}");
    Ok(())
}
