//! `toolcall config validate|show`.

use std::io::Write;

use tc_domain::config::{Config, ConfigSeverity};

/// Check the resolved config and report to `out`, errors before warnings.
///
/// Returns `Ok(false)` if anything would stop an invocation from running.
pub fn validate(config: &Config, config_path: &str, out: &mut impl Write) -> anyhow::Result<bool> {
    let (errors, warnings): (Vec<_>, Vec<_>) = config
        .validate()
        .into_iter()
        .partition(|issue| issue.severity == ConfigSeverity::Error);

    for issue in errors.iter().chain(&warnings) {
        writeln!(out, "{issue}")?;
    }

    let verdict = if errors.is_empty() { "usable" } else { "rejected" };
    writeln!(
        out,
        "{config_path}: {verdict} ({} blocking, {} advisory)",
        errors.len(),
        warnings.len()
    )?;

    Ok(errors.is_empty())
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    write!(out, "{}", config.to_toml_string()?)?;
    Ok(())
}
