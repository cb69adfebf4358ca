//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod channels;
pub mod config_cmd;
pub mod events;
pub mod log;
pub mod programs;
pub mod services;
pub mod settings;
pub mod system;
pub mod tuners;
pub mod util;

use mirakurun_api::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Channels(args) => channels::handle(client, args, global).await,
        Command::Services(args) => services::handle(client, args, global).await,
        Command::Programs(args) => programs::handle(client, args, global).await,
        Command::Tuners(args) => tuners::handle(client, args, global).await,
        Command::Events(args) => events::handle(client, args, global).await,
        Command::Log(args) => log::handle(client, args, global).await,
        Command::Version(args) => system::handle_version(client, args, global).await,
        Command::Status => system::handle_status(client, global).await,
        Command::Restart => system::handle_restart(client, global).await,
        Command::Settings(args) => settings::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
