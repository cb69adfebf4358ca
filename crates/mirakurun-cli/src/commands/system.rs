//! Server-wide command handlers: version, status, restart.

use indicatif::HumanBytes;
use mirakurun_api::{Client, Status, Version, VersionUpdateOptions};

use crate::cli::{GlobalOpts, VersionArgs, VersionCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Detail views ────────────────────────────────────────────────────

fn version_detail(v: &Version) -> String {
    let mut lines = vec![
        format!("Current: {}", v.current),
        format!(
            "Latest:  {}",
            output::or_dash(Some(v.latest.as_str()).filter(|s| !s.is_empty()))
        ),
    ];
    if v.is_update_available() {
        lines.push("Update available: run `mirakurun version update`".into());
    }
    lines.join("\n")
}

fn counts(map: &indexmap::IndexMap<String, u64>) -> String {
    if map.is_empty() {
        return "-".into();
    }
    map.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_detail(s: &Status) -> String {
    let mut lines = vec![
        format!("Version:        {}", s.version),
        format!("Platform:       {} ({})", s.process.platform, s.process.arch),
        format!("PID:            {}", s.process.pid),
    ];
    if let Some(rss) = s.process.memory_usage.get("rss") {
        lines.push(format!("Memory (RSS):   {}", HumanBytes(*rss)));
    }
    lines.extend([
        format!("Stored events:  {}", s.epg.stored_events),
        format!(
            "EPG gathering:  {}",
            if s.epg.gathering_networks.is_empty() {
                "-".into()
            } else {
                s.epg
                    .gathering_networks
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        ),
        format!("Streams:        {}", counts(&s.stream_count)),
        format!("Errors:         {}", counts(&s.error_count)),
        format!(
            "Timer accuracy: {:.1}us (1m avg {})",
            s.timer_accuracy.last,
            s.timer_accuracy
                .m1
                .get("avg")
                .map_or_else(|| "-".into(), |avg| format!("{avg:.1}us"))
        ),
    ]);
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_version(
    client: &Client,
    args: VersionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VersionCommand::Check => {
            let version = client.check_version().await?.into_data();
            let out = output::render_single(&global.format(), &version, version_detail, |v| {
                v.current.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VersionCommand::Update { force } => {
            let resp = client
                .update_version(Some(&VersionUpdateOptions { force }))
                .await?;
            if !global.quiet {
                eprintln!("Update started (HTTP {})", resp.status.as_u16());
            }
            util::follow_text(resp.into_data(), global.quiet).await
        }
    }
}

pub async fn handle_status(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let status = client.get_status().await?.into_data();
    let out = output::render_single(&global.format(), &status, status_detail, |s| {
        s.version.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_restart(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let resp = client.restart().await?.into_data();
    if !global.quiet {
        eprintln!("Restart requested (helper PID {})", resp.pid);
    }
    Ok(())
}
