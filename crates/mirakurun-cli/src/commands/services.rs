//! Service command handlers.

use mirakurun_api::{Client, Service, ServicesListOptions};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ServicesArgs, ServicesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct ServiceRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "SID")]
    service_id: u16,
    #[tabled(rename = "NID")]
    network_id: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Logo")]
    logo: &'static str,
}

impl From<&Service> for ServiceRow {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id,
            service_id: s.service_id,
            network_id: s.network_id,
            name: s.name.clone(),
            channel: s
                .channel
                .as_ref()
                .map_or_else(|| "-".into(), |c| format!("{} {}", c.channel_type, c.channel)),
            logo: output::yes_no(s.has_logo_data),
        }
    }
}

pub(super) fn detail(s: &Service) -> String {
    let mut lines = vec![
        format!("ID:         {}", s.id),
        format!("Name:       {}", s.name),
        format!("Service ID: {}", s.service_id),
        format!("Network ID: {}", s.network_id),
        format!(
            "Type:       {}",
            s.service_type.map_or_else(|| "-".into(), |t| t.to_string())
        ),
    ];
    if let Some(ref ch) = s.channel {
        lines.push(format!("Channel:    {} {}", ch.channel_type, ch.channel));
    }
    if let Some(key) = s.remote_control_key_id {
        lines.push(format!("Remote key: {key}"));
    }
    lines.push(format!("Logo:       {}", output::yes_no(s.has_logo_data)));
    lines.join("\n")
}

pub(super) fn id(s: &Service) -> String {
    s.id.to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: ServicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.format();

    match args.command {
        ServicesCommand::List {
            service_id,
            network_id,
            name,
            service_type,
            channel_type,
            channel,
        } => {
            let opts = ServicesListOptions {
                service_id,
                network_id,
                name,
                service_type,
                channel_type: channel_type.map(Into::into),
                channel,
            };
            let services = client.get_services(Some(&opts)).await?.into_data();
            let out = output::render_list(&format, &services, |s| ServiceRow::from(s), id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServicesCommand::Get { id: service } => {
            let svc = client
                .get_service(service)
                .await
                .map_err(|e| CliError::not_found_as(e, "service", service, "services list"))?
                .into_data();
            let out = output::render_single(&format, &svc, detail, id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServicesCommand::Logo {
            id: service,
            output_file,
        } => {
            let resp = client
                .get_logo_image(service)
                .await
                .map_err(|e| CliError::not_found_as(e, "service logo", service, "services list"))?;
            util::pipe_stream(resp.into_data(), output_file.as_deref(), global.quiet).await?;
            Ok(())
        }

        ServicesCommand::Stream {
            id: service,
            stream,
        } => {
            if !global.quiet {
                eprintln!("Recording service {service} (Ctrl-C to stop)");
            }
            let resp = client
                .get_service_stream(service, stream.decode)
                .await
                .map_err(|e| CliError::not_found_as(e, "service", service, "services list"))?;
            util::pipe_stream(resp.into_data(), stream.output_file.as_deref(), global.quiet)
                .await?;
            Ok(())
        }
    }
}
