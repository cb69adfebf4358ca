//! Channel command handlers.

use mirakurun_api::{Channel, ChannelType, ChannelsListOptions, Client};
use tabled::Tabled;

use crate::cli::{ChannelsArgs, ChannelsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{services, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "Type")]
    channel_type: ChannelType,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Services")]
    services: usize,
}

impl From<&Channel> for ChannelRow {
    fn from(c: &Channel) -> Self {
        Self {
            channel_type: c.channel_type,
            channel: c.channel.clone(),
            name: output::or_dash(c.name.as_deref()),
            services: c.services.len(),
        }
    }
}

fn detail(c: &Channel) -> String {
    let mut lines = vec![
        format!("Type:     {}", c.channel_type),
        format!("Channel:  {}", c.channel),
        format!("Name:     {}", output::or_dash(c.name.as_deref())),
    ];
    if let Some(ref sat) = c.satelite {
        lines.push(format!("Satellite: {sat}"));
    }
    if let Some(space) = c.space {
        lines.push(format!("Space:    {space}"));
    }
    for svc in &c.services {
        lines.push(format!("Service:  {} {} ({})", svc.service_id, svc.name, svc.id));
    }
    lines.join("\n")
}

fn channel_key(c: &Channel) -> String {
    format!("{}/{}", c.channel_type, c.channel)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: ChannelsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.format();

    match args.command {
        ChannelsCommand::List {
            channel_type,
            channel,
            name,
        } => {
            let opts = ChannelsListOptions {
                channel_type: None,
                channel,
                name,
            };
            // A type filter goes in the path; the rest stay in the query.
            let channels = match channel_type {
                Some(t) => client.get_channels_by_type(t.into(), Some(&opts)).await?,
                None => client.get_channels(Some(&opts)).await?,
            }
            .into_data();

            let out = output::render_list(&format, &channels, |c| ChannelRow::from(c), channel_key)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ChannelsCommand::Get {
            channel_type,
            channel,
        } => {
            let ch = client
                .get_channel(channel_type.into(), &channel)
                .await
                .map_err(|e| {
                    CliError::not_found_as(
                        e,
                        "channel",
                        format!("{}/{channel}", ChannelType::from(channel_type)),
                        "channels list",
                    )
                })?
                .into_data();
            let out = output::render_single(&format, &ch, detail, channel_key)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ChannelsCommand::Services {
            channel_type,
            channel,
            sid,
        } => {
            let channel_type = ChannelType::from(channel_type);
            if let Some(sid) = sid {
                let svc = client
                    .get_service_by_channel(channel_type, &channel, sid)
                    .await
                    .map_err(|e| {
                        CliError::not_found_as(
                            e,
                            "service",
                            format!("{channel_type}/{channel}/{sid}"),
                            "channels services",
                        )
                    })?
                    .into_data();
                let out = output::render_single(&format, &svc, services::detail, services::id)?;
                output::print_output(&out, global.quiet);
            } else {
                let list = client
                    .get_services_by_channel(channel_type, &channel)
                    .await?
                    .into_data();
                let out = output::render_list(
                    &format,
                    &list,
                    |s| services::ServiceRow::from(s),
                    services::id,
                )?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        ChannelsCommand::Stream {
            channel_type,
            channel,
            sid,
            stream,
        } => {
            let channel_type = ChannelType::from(channel_type);
            if !global.quiet {
                eprintln!("Recording {channel_type}/{channel} service {sid} (Ctrl-C to stop)");
            }
            let resp = client
                .get_service_stream_by_channel(channel_type, &channel, sid, stream.decode)
                .await?;
            util::pipe_stream(resp.into_data(), stream.output_file.as_deref(), global.quiet)
                .await?;
            Ok(())
        }
    }
}
