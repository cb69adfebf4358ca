//! Clap derive structures for the `mirakurun` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap and clap_complete may be used here: `build.rs` includes this
//! file to render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mirakurun -- command-line client for Mirakurun tuner servers
#[derive(Debug, Parser)]
#[command(
    name = "mirakurun",
    version,
    about = "Query and control a Mirakurun tuner server",
    long_about = "Browse channels, services and programs, watch live events, record \
        MPEG-TS streams and manage the configuration of a Mirakurun server.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "MIRAKURUN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL, e.g. http://tuner.local:40772/api/ (overrides profile)
    #[arg(long, short = 'u', env = "MIRAKURUN_URL", global = true)]
    pub url: Option<String>,

    /// Value sent as X-Mirakurun-Priority (overrides profile)
    #[arg(
        long,
        env = "MIRAKURUN_PRIORITY",
        global = true,
        allow_negative_numbers = true
    )]
    pub priority: Option<i32>,

    /// Output format [default: table, or `defaults.output` from the config file]
    #[arg(long, short = 'o', env = "MIRAKURUN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Request timeout in seconds (0 disables the deadline)
    #[arg(long, env = "MIRAKURUN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    /// The selected output format, `table` when nothing chose one.
    pub fn format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

/// Broadcast channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelTypeArg {
    #[value(name = "GR")]
    Gr,
    #[value(name = "BS")]
    Bs,
    #[value(name = "CS")]
    Cs,
    #[value(name = "SKY")]
    Sky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventResourceArg {
    Program,
    Service,
    Tuner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventTypeArg {
    Create,
    Update,
    Remove,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse channels and their services
    #[command(alias = "ch")]
    Channels(ChannelsArgs),

    /// Browse services, fetch logos, record streams
    #[command(alias = "svc")]
    Services(ServicesArgs),

    /// Browse the program guide and record programs
    #[command(alias = "prog")]
    Programs(ProgramsArgs),

    /// Inspect tuner devices and their processes
    Tuners(TunersArgs),

    /// Show recent events or follow the live event feed
    Events(EventsArgs),

    /// Read the server log
    Log(LogArgs),

    /// Check or update the server version
    Version(VersionArgs),

    /// Show server status
    Status,

    /// Restart the server process
    Restart,

    /// Manage server-side configuration (channels, server, tuners)
    Settings(SettingsArgs),

    /// Manage local CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Stream Arguments ──────────────────────────────────────────

/// Destination and decoding options for MPEG-TS downloads.
#[derive(Debug, Args)]
pub struct StreamArgs {
    /// Ask the server to descramble the stream
    #[arg(long, short = 'd')]
    pub decode: bool,

    /// Write to this file instead of stdout
    #[arg(long = "output-file", short = 'O')]
    pub output_file: Option<PathBuf>,
}

// ── Channels ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ChannelsArgs {
    #[command(subcommand)]
    pub command: ChannelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChannelsCommand {
    /// List channels
    #[command(alias = "ls")]
    List {
        /// Only channels of this type
        #[arg(long = "type", short = 't', ignore_case = true)]
        channel_type: Option<ChannelTypeArg>,

        /// Only this physical channel
        #[arg(long)]
        channel: Option<String>,

        /// Only channels whose name matches
        #[arg(long)]
        name: Option<String>,
    },

    /// Show one channel
    Get {
        #[arg(ignore_case = true)]
        channel_type: ChannelTypeArg,
        channel: String,
    },

    /// List services on a channel, or show one with --sid
    Services {
        #[arg(ignore_case = true)]
        channel_type: ChannelTypeArg,
        channel: String,

        /// Service ID within the channel
        #[arg(long)]
        sid: Option<u16>,
    },

    /// Record a service addressed by channel and service ID
    Stream {
        #[arg(ignore_case = true)]
        channel_type: ChannelTypeArg,
        channel: String,
        sid: u16,

        #[command(flatten)]
        stream: StreamArgs,
    },
}

// ── Services ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List services
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        service_id: Option<u16>,

        #[arg(long)]
        network_id: Option<u16>,

        #[arg(long)]
        name: Option<String>,

        /// ARIB service type, e.g. 1 for digital TV
        #[arg(long = "type")]
        service_type: Option<u8>,

        #[arg(long, ignore_case = true)]
        channel_type: Option<ChannelTypeArg>,

        #[arg(long)]
        channel: Option<String>,
    },

    /// Show one service by its combined ID
    Get { id: u64 },

    /// Download the service logo (PNG)
    Logo {
        id: u64,

        /// Write to this file instead of stdout
        #[arg(long = "output-file", short = 'O')]
        output_file: Option<PathBuf>,
    },

    /// Record a service
    Stream {
        id: u64,

        #[command(flatten)]
        stream: StreamArgs,
    },
}

// ── Programs ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProgramsArgs {
    #[command(subcommand)]
    pub command: ProgramsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProgramsCommand {
    /// List programs in the guide
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        network_id: Option<u16>,

        #[arg(long)]
        service_id: Option<u16>,

        #[arg(long)]
        event_id: Option<u16>,
    },

    /// Show one program
    Get { id: u64 },

    /// Record a program while it airs
    Stream {
        id: u64,

        #[command(flatten)]
        stream: StreamArgs,
    },
}

// ── Tuners ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TunersArgs {
    #[command(subcommand)]
    pub command: TunersCommand,
}

#[derive(Debug, Subcommand)]
pub enum TunersCommand {
    /// List tuner devices
    #[command(alias = "ls")]
    List,

    /// Show one tuner
    Get { index: u32 },

    /// Show the PID of the tuner's process
    Process { index: u32 },

    /// Kill the tuner's process
    Kill { index: u32 },
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Show buffered recent events
    #[command(alias = "ls")]
    List,

    /// Follow live events until interrupted
    Watch {
        #[arg(long)]
        resource: Option<EventResourceArg>,

        #[arg(long = "type")]
        event_type: Option<EventTypeArg>,
    },
}

// ── Log ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Print the buffered log
    Show,

    /// Follow the log until interrupted
    Tail,
}

// ── Version ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Compare the running version with the latest release
    Check,

    /// Update the server and follow the progress output
    Update {
        /// Update even when already on the latest version
        #[arg(long)]
        force: bool,
    },
}

// ── Settings (server-side config) ────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingsTarget {
    Channels,
    Server,
    Tuners,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show a server configuration document
    Get { target: SettingsTarget },

    /// Replace a server configuration document
    Put {
        target: SettingsTarget,

        /// JSON document to upload ("-" reads stdin)
        #[arg(long = "from-file", short = 'F')]
        from_file: PathBuf,
    },

    /// Scan for channels and follow the progress output
    Scan {
        #[arg(long = "type", short = 't', ignore_case = true)]
        channel_type: Option<ChannelTypeArg>,

        /// Lowest channel number to scan
        #[arg(long)]
        min: Option<u32>,

        /// Highest channel number to scan
        #[arg(long)]
        max: Option<u32>,
    },
}

// ── Config (local) ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Create or update a profile from --url, --priority and --timeout
    SetProfile {
        /// Profile name
        name: String,

        /// Prefix for the User-Agent header
        #[arg(long)]
        user_agent: Option<String>,

        /// Also make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
