//! Local config subcommand handlers.

use mirakurun_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn profile_lines(name: &str, p: &Profile, is_default: bool) -> Vec<String> {
    let marker = if is_default { " *" } else { "" };
    let mut lines = vec![
        format!("[{name}]{marker}"),
        format!("  url:        {}", p.url),
    ];
    if let Some(priority) = p.priority {
        lines.push(format!("  priority:   {priority}"));
    }
    if let Some(ref agent) = p.user_agent {
        lines.push(format!("  user_agent: {agent}"));
    }
    if let Some(timeout) = p.timeout {
        lines.push(format!("  timeout:    {timeout}s"));
    }
    lines
}

fn detail(cfg: &Config) -> String {
    let default = cfg.default_profile.as_deref().unwrap_or("default");
    let mut lines = vec![
        format!("Config file: {}", config::config_path().display()),
        format!("Default profile: {default}"),
        format!("Output: {}", cfg.defaults.output),
        format!(
            "Timeout: {}",
            cfg.defaults
                .timeout
                .map_or_else(|| "none".into(), |t| format!("{t}s"))
        ),
    ];
    if cfg.profiles.is_empty() {
        lines.push(
            "No profiles configured. Run: mirakurun config set-profile <NAME> --url <URL>".into(),
        );
    }
    for (name, profile) in &cfg.profiles {
        lines.push(String::new());
        lines.extend(profile_lines(name, profile, name == default));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let format = config::resolve_output(global, &cfg)?;
            let out = output::render_single(&format, &cfg, detail, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── SetProfile ──────────────────────────────────────────────
        ConfigCommand::SetProfile {
            name,
            user_agent,
            default,
        } => {
            let mut cfg = config::load_config()?;
            let profile = cfg.profiles.entry(name.clone()).or_default();

            if let Some(ref url) = global.url {
                profile.url.clone_from(url);
            }
            if global.priority.is_some() {
                profile.priority = global.priority;
            }
            if global.timeout.is_some() {
                profile.timeout = global.timeout;
            }
            if user_agent.is_some() {
                profile.user_agent = user_agent;
            }
            // Reject a bad URL before it lands on disk.
            profile.base_url()?;

            if default {
                cfg.default_profile = Some(name.clone());
            }
            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Saved profile '{name}' to {}", path.display());
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
