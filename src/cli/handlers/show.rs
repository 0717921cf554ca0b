// src/cli/handlers/show.rs

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use super::commons;
use crate::{core::commons::render_value, models::CliFlags, models::Settings};

/// Prints the configuration screen, or the raw merged tree with `raw`.
pub fn handle(flags: &CliFlags, raw: bool) -> Result<()> {
    let settings = commons::load_settings(flags)?;
    let mut stdout = io::stdout().lock();
    if raw {
        let text =
            serde_yaml::to_string(&settings.tree).context("Failed to serialize the settings")?;
        write!(stdout, "{}", text)?;
    } else {
        render(&settings, &mut stdout)?;
    }
    Ok(())
}

/// Renders the configuration screen: flags, task environment and services.
pub fn render(settings: &Settings, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "DCSH Configuration".white().bold().underline())?;
    writeln!(out, "{}", "Flags".white().bold())?;

    write!(out, "{}", "  Debug mode: ".yellow())?;
    if settings.debug {
        writeln!(out, "{}", "Enabled".green())?;
    } else {
        writeln!(out, "{}", "Disabled".red())?;
    }
    write!(out, "{}", "  Sudo mode: ".yellow())?;
    if settings.sudo {
        writeln!(out, "{}", "Enabled - Calls to `dc` will use `sudo`.".green())?;
    } else {
        writeln!(out, "{}", "Disabled".red())?;
    }
    write!(out, "{}", "  Wrapped tool: ".yellow())?;
    writeln!(out, "{}", settings.dc_path)?;

    writeln!(out)?;
    if settings.environment.is_empty() {
        writeln!(out, "No task environment vars are configured.")?;
    } else {
        writeln!(out, "{}", "Task environment".white().bold())?;
        for (name, value) in &settings.environment {
            write!(out, "{}", format!("  {}: ", name).yellow())?;
            writeln!(out, "{}", value)?;
        }
    }

    if !settings.services.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Services".white().bold())?;
        for name in settings.services.keys() {
            writeln!(out, "{}", format!("  {}", render_value(name)).yellow())?;
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commons::key;
    use serde_yaml::{Mapping, Value};

    fn rendered(settings: &Settings) -> String {
        let mut out = Vec::new();
        render(settings, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_default_settings_screen() {
        let text = rendered(&Settings::default());
        assert!(text.contains("DCSH Configuration"));
        assert!(text.contains("Debug mode"));
        assert!(text.contains("Disabled"));
        assert!(text.contains("No task environment vars are configured."));
        assert!(!text.contains("Services"));
    }

    #[test]
    fn test_enabled_flags_environment_and_services() {
        let mut services = Mapping::new();
        services.insert(key("web"), Value::Null);
        let settings = Settings {
            debug: true,
            sudo: true,
            environment: vec![("FOO".into(), "1".into())],
            services,
            ..Default::default()
        };
        let text = rendered(&settings);
        assert!(text.contains("will use `sudo`"));
        assert!(text.contains("FOO"));
        assert!(text.contains("Services"));
        assert!(text.contains("web"));
    }
}
