//! Program guide command handlers.

use mirakurun_api::{Client, Program, ProgramsListOptions};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ProgramsArgs, ProgramsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProgramRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "SID")]
    service_id: u16,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Length")]
    length: String,
    #[tabled(rename = "Title")]
    name: String,
}

impl From<&Program> for ProgramRow {
    fn from(p: &Program) -> Self {
        Self {
            id: p.id,
            service_id: p.service_id,
            start: util::local_time(p.start_at),
            length: util::minutes(p.duration),
            name: output::or_dash(p.name.as_deref()),
        }
    }
}

fn detail(p: &Program) -> String {
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Title:       {}", output::or_dash(p.name.as_deref())),
        format!("Service:     {} (network {})", p.service_id, p.network_id),
        format!("Event ID:    {}", p.event_id),
        format!(
            "Airs:        {} - {}",
            util::local_time(p.start_at),
            p.end_at().map_or_else(|| "-".into(), util::local_time)
        ),
        format!("Length:      {}", util::minutes(p.duration)),
        format!("Free:        {}", output::yes_no(p.is_free)),
    ];
    if let Some(ref video) = p.video {
        lines.push(format!(
            "Video:       {}",
            output::or_dash(video.resolution.as_deref())
        ));
    }
    if let Some(ref series) = p.series {
        let episode = series
            .episode
            .map_or_else(String::new, |ep| format!(" #{ep}"));
        lines.push(format!("Series:      {}{episode}", series.name));
    }
    if let Some(ref desc) = p.description {
        lines.push(String::new());
        lines.push(desc.clone());
    }
    for (heading, text) in &p.extended {
        lines.push(String::new());
        lines.push(format!("[{heading}]"));
        lines.push(text.clone());
    }
    lines.join("\n")
}

fn id(p: &Program) -> String {
    p.id.to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: ProgramsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.format();

    match args.command {
        ProgramsCommand::List {
            network_id,
            service_id,
            event_id,
        } => {
            let opts = ProgramsListOptions {
                network_id,
                service_id,
                event_id,
            };
            let mut programs = client.get_programs(Some(&opts)).await?.into_data();
            programs.sort_by_key(|p| (p.service_id, p.start_at));

            let out = output::render_list(&format, &programs, |p| ProgramRow::from(p), id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProgramsCommand::Get { id: program } => {
            let prog = client
                .get_program(program)
                .await
                .map_err(|e| CliError::not_found_as(e, "program", program, "programs list"))?
                .into_data();
            let out = output::render_single(&format, &prog, detail, id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProgramsCommand::Stream {
            id: program,
            stream,
        } => {
            if !global.quiet {
                eprintln!("Recording program {program} (Ctrl-C to stop)");
            }
            let resp = client
                .get_program_stream(program, stream.decode)
                .await
                .map_err(|e| CliError::not_found_as(e, "program", program, "programs list"))?;
            util::pipe_stream(resp.into_data(), stream.output_file.as_deref(), global.quiet)
                .await?;
            Ok(())
        }
    }
}
