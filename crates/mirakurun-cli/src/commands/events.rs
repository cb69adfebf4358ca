//! Event command handlers.

use mirakurun_api::{Client, Event, EventsListOptions};
use tabled::Tabled;

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Type")]
    event_type: String,
    #[tabled(rename = "Target")]
    target: String,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            time: util::local_time(e.time),
            resource: e.resource.to_string(),
            event_type: e.event_type.to_string(),
            target: target(e),
        }
    }
}

/// Best identifier inside the event payload: `id` for programs and
/// services, `index` for tuners.
fn target(e: &Event) -> String {
    ["id", "index"]
        .iter()
        .find_map(|key| e.data.get(key))
        .map_or_else(|| "-".into(), ToString::to_string)
}

fn line(e: &Event) -> String {
    format!(
        "{} {:<7} {:<6} {}",
        util::local_time(e.time),
        e.resource,
        e.event_type,
        target(e)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.format();

    match args.command {
        EventsCommand::List => {
            let events = client.get_events().await?.into_data();
            let out = output::render_list(&format, &events, |e| EventRow::from(e), line)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Watch {
            resource,
            event_type,
        } => {
            let opts = EventsListOptions {
                resource: resource.map(Into::into),
                event_type: event_type.map(Into::into),
            };
            let mut events = client.watch_events(Some(&opts)).await?.into_data();
            if !global.quiet {
                eprintln!("Watching events (Ctrl-C to stop)");
            }

            let token = util::interrupt_token();
            let mut seen = 0usize;
            while let Some(event) = util::next_or_interrupt(&mut events, &token).await? {
                seen += 1;
                let out = output::render_single(&format, &event, line, line)?;
                output::print_output(&out, global.quiet);
            }
            tracing::debug!(seen, "event stream closed");
            Ok(())
        }
    }
}
