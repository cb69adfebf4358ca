//! Server log command handlers.

use mirakurun_api::Client;

use crate::cli::{GlobalOpts, LogArgs, LogCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(client: &Client, args: LogArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LogCommand::Show => {
            let log = client.get_log().await?.into_data();
            let text = String::from_utf8_lossy(&log);
            crate::output::print_output(text.trim_end(), global.quiet);
            Ok(())
        }

        LogCommand::Tail => {
            let resp = client.get_log_stream().await?;
            util::follow_text(resp.into_data(), global.quiet).await
        }
    }
}
