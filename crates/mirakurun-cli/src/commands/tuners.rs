//! Tuner command handlers.

use mirakurun_api::{Client, TunerDevice, TunerProcess};
use tabled::Tabled;

use crate::cli::{GlobalOpts, TunersArgs, TunersCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TunerRow {
    #[tabled(rename = "#")]
    index: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "State")]
    state: &'static str,
    #[tabled(rename = "Users")]
    users: usize,
    #[tabled(rename = "PID")]
    pid: String,
}

impl From<&TunerDevice> for TunerRow {
    fn from(t: &TunerDevice) -> Self {
        Self {
            index: t.index,
            name: t.name.clone(),
            types: join_types(t),
            state: state(t),
            users: t.users.len(),
            pid: t.pid.map_or_else(|| "-".into(), |p| p.to_string()),
        }
    }
}

fn join_types(t: &TunerDevice) -> String {
    t.types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn state(t: &TunerDevice) -> &'static str {
    if t.is_fault {
        "fault"
    } else if !t.is_available {
        "disabled"
    } else if t.is_using {
        "in use"
    } else {
        "free"
    }
}

fn detail(t: &TunerDevice) -> String {
    let mut lines = vec![
        format!("Index:   {}", t.index),
        format!("Name:    {}", t.name),
        format!("Types:   {}", join_types(t)),
        format!("State:   {}", state(t)),
        format!("Command: {}", output::or_dash(t.command.as_deref())),
        format!(
            "PID:     {}",
            t.pid.map_or_else(|| "-".into(), |p| p.to_string())
        ),
    ];
    for user in &t.users {
        lines.push(format!(
            "User:    {} (priority {}, {})",
            user.id,
            user.priority,
            output::or_dash(user.agent.as_deref())
        ));
    }
    lines.join("\n")
}

fn index(t: &TunerDevice) -> String {
    t.index.to_string()
}

fn pid(p: &TunerProcess) -> String {
    p.pid.to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: TunersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.format();
    let not_found = |e: mirakurun_api::Error, idx: u32| {
        CliError::not_found_as(e, "tuner", idx, "tuners list")
    };

    match args.command {
        TunersCommand::List => {
            let tuners = client.get_tuners().await?.into_data();
            let out = output::render_list(&format, &tuners, |t| TunerRow::from(t), index)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TunersCommand::Get { index: idx } => {
            let tuner = client
                .get_tuner(idx)
                .await
                .map_err(|e| not_found(e, idx))?
                .into_data();
            let out = output::render_single(&format, &tuner, detail, index)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TunersCommand::Process { index: idx } => {
            let process = client
                .get_tuner_process(idx)
                .await
                .map_err(|e| not_found(e, idx))?
                .into_data();
            let out = output::render_single(&format, &process, pid, pid)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TunersCommand::Kill { index: idx } => {
            let process = client
                .kill_tuner_process(idx)
                .await
                .map_err(|e| not_found(e, idx))?
                .into_data();
            if !global.quiet {
                eprintln!("Killed tuner {idx} process {}", process.pid);
            }
            Ok(())
        }
    }
}
