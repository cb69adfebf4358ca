//! Shared helpers for command handlers.

use std::path::Path;
use std::time::Duration;

use chrono::Local;
use futures_util::{Stream, TryStreamExt};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use mirakurun_api::{ByteStream, ChannelType, EventResource, EventType, Timestamp, cancellable};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::cli::{ChannelTypeArg, EventResourceArg, EventTypeArg};
use crate::error::CliError;

// ── Argument conversions ─────────────────────────────────────────────

impl From<ChannelTypeArg> for ChannelType {
    fn from(arg: ChannelTypeArg) -> Self {
        match arg {
            ChannelTypeArg::Gr => Self::Gr,
            ChannelTypeArg::Bs => Self::Bs,
            ChannelTypeArg::Cs => Self::Cs,
            ChannelTypeArg::Sky => Self::Sky,
        }
    }
}

impl From<EventResourceArg> for EventResource {
    fn from(arg: EventResourceArg) -> Self {
        match arg {
            EventResourceArg::Program => Self::Program,
            EventResourceArg::Service => Self::Service,
            EventResourceArg::Tuner => Self::Tuner,
        }
    }
}

impl From<EventTypeArg> for EventType {
    fn from(arg: EventTypeArg) -> Self {
        match arg {
            EventTypeArg::Create => Self::Create,
            EventTypeArg::Update => Self::Update,
            EventTypeArg::Remove => Self::Remove,
        }
    }
}

// ── Formatting ───────────────────────────────────────────────────────

/// Local wall-clock time for table cells.
pub fn local_time(ts: Timestamp) -> String {
    ts.as_datetime()
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Render a millisecond duration as `1h30m` / `25m`.
pub fn minutes(duration_ms: u64) -> String {
    let total = duration_ms / 60_000;
    match (total / 60, total % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m:02}m"),
    }
}

// ── Interruption ─────────────────────────────────────────────────────

/// A token cancelled on Ctrl-C, so long-lived streams end cleanly.
pub fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, closing stream");
            trigger.cancel();
        }
    });
    token
}

/// Next item of a client stream, or `None` once the token fires.
pub async fn next_or_interrupt<S, T>(
    stream: &mut S,
    token: &CancellationToken,
) -> Result<Option<T>, CliError>
where
    S: Stream<Item = Result<T, mirakurun_api::Error>> + Unpin + Send,
    T: Send,
{
    match cancellable(token, stream.try_next()).await {
        Err(mirakurun_api::Error::Cancelled) => Ok(None),
        other => Ok(other?),
    }
}

// ── Stream downloads ─────────────────────────────────────────────────

fn byte_counter(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {bytes} received ({binary_bytes_per_sec}) {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Copy a response body to `output_file` (or stdout) until it ends or the
/// user interrupts. Returns the number of bytes written.
pub async fn pipe_stream(
    mut body: ByteStream,
    output_file: Option<&Path>,
    quiet: bool,
) -> Result<u64, CliError> {
    let mut writer: Box<dyn AsyncWrite + Unpin + Send> = match output_file {
        Some(path) => Box::new(tokio::fs::File::create(path).await?),
        None => Box::new(tokio::io::stdout()),
    };

    let token = interrupt_token();
    let progress = byte_counter(quiet);
    let mut written = 0u64;

    while let Some(chunk) = next_or_interrupt(&mut body, &token).await? {
        writer.write_all(&chunk).await?;
        let n = u64::try_from(chunk.len()).unwrap_or(u64::MAX);
        written += n;
        progress.inc(n);
    }
    writer.flush().await?;
    progress.finish_and_clear();

    if !quiet {
        match output_file {
            Some(path) => eprintln!("{} written to {}", HumanBytes(written), path.display()),
            None => eprintln!("{} written", HumanBytes(written)),
        }
    }
    Ok(written)
}

/// Follow a text stream (log, scan or update progress) line by line on
/// stdout until it ends or the user interrupts.
pub async fn follow_text(mut body: ByteStream, quiet: bool) -> Result<(), CliError> {
    let token = interrupt_token();
    let mut stdout = tokio::io::stdout();
    while let Some(chunk) = next_or_interrupt(&mut body, &token).await? {
        if !quiet {
            stdout.write_all(&chunk).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

// ── Input files ──────────────────────────────────────────────────────

/// Read and parse a JSON document for `--from-file` flags (`-` is stdin).
pub async fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = if path == Path::new("-") {
        read_all(tokio::io::stdin()).await?
    } else {
        tokio::fs::read_to_string(path).await?
    };
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

async fn read_all(mut reader: impl AsyncRead + Unpin) -> Result<String, CliError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).await?;
    Ok(buf)
}
