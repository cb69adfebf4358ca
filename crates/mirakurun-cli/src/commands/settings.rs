//! Server-side configuration handlers (`/api/config/*`).

use mirakurun_api::{ChannelConfig, ChannelScanOptions, Client, ServerConfig, TunerConfig};
use tabled::Tabled;

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand, SettingsTarget};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ChannelConfigRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    channel_type: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "SID")]
    service_id: String,
    #[tabled(rename = "Disabled")]
    disabled: &'static str,
}

impl From<&ChannelConfig> for ChannelConfigRow {
    fn from(c: &ChannelConfig) -> Self {
        Self {
            name: c.name.clone(),
            channel_type: c.channel_type.to_string(),
            channel: c.channel.clone(),
            service_id: c.service_id.map_or_else(|| "-".into(), |s| s.to_string()),
            disabled: output::yes_no(c.is_disabled),
        }
    }
}

#[derive(Tabled)]
struct TunerConfigRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Disabled")]
    disabled: &'static str,
}

impl From<&TunerConfig> for TunerConfigRow {
    fn from(t: &TunerConfig) -> Self {
        Self {
            name: t.name.clone(),
            types: t
                .types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            command: output::or_dash(t.command.as_deref().or(t.dvb_device_path.as_deref())),
            disabled: output::yes_no(t.is_disabled),
        }
    }
}

fn server_detail(c: &ServerConfig) -> String {
    output::render_yaml(c).unwrap_or_default().trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.format();

    match args.command {
        SettingsCommand::Get { target } => {
            let out = match target {
                SettingsTarget::Channels => {
                    let channels = client.get_channels_config().await?.into_data();
                    output::render_list(
                        &format,
                        &channels,
                        |c| ChannelConfigRow::from(c),
                        |c| c.name.clone(),
                    )?
                }
                SettingsTarget::Server => {
                    let server = client.get_server_config().await?.into_data();
                    output::render_single(&format, &server, server_detail, server_detail)?
                }
                SettingsTarget::Tuners => {
                    let tuners = client.get_tuners_config().await?.into_data();
                    output::render_list(
                        &format,
                        &tuners,
                        |t| TunerConfigRow::from(t),
                        |t| t.name.clone(),
                    )?
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Put { target, from_file } => {
            let count = match target {
                SettingsTarget::Channels => {
                    let channels: Vec<ChannelConfig> = util::read_json_file(&from_file).await?;
                    client.update_channels_config(&channels).await?.into_data().len()
                }
                SettingsTarget::Server => {
                    let server: ServerConfig = util::read_json_file(&from_file).await?;
                    client.update_server_config(&server).await?;
                    1
                }
                SettingsTarget::Tuners => {
                    let tuners: Vec<TunerConfig> = util::read_json_file(&from_file).await?;
                    client.update_tuners_config(&tuners).await?.into_data().len()
                }
            };
            if !global.quiet {
                eprintln!("Updated {target:?} configuration ({count} entries stored)");
            }
            Ok(())
        }

        SettingsCommand::Scan {
            channel_type,
            min,
            max,
        } => {
            if let Some((lo, hi)) = min.zip(max).filter(|(lo, hi)| lo > hi) {
                return Err(CliError::Validation {
                    field: "min".into(),
                    reason: format!("--min {lo} is greater than --max {hi}"),
                });
            }
            let opts = ChannelScanOptions {
                channel_type: channel_type.map(Into::into),
                min,
                max,
            };
            let resp = client.channel_scan(Some(&opts)).await?;
            util::follow_text(resp.into_data(), global.quiet).await
        }
    }
}
