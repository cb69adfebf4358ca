// mirakurun-api: Async Rust client for the Mirakurun tuner server API

pub mod client;
pub mod error;
pub mod models;
pub mod stream;
pub mod timestamp;
pub mod transport;

mod channels;
mod config;
mod events;
mod log;
mod programs;
mod query;
mod restart;
mod services;
mod status;
mod tuners;
mod version;

pub use client::{
    ApiResponse, Client, ClientBuilder, DEFAULT_BASE_URL, MPEG_TS, PRIORITY_HEADER, cancellable,
};
pub use error::Error;
pub use models::{
    Channel, ChannelConfig, ChannelScanOptions, ChannelType, ChannelsListOptions, DecodeOptions,
    EpgStatus, Event, EventResource, EventType, EventsListOptions, ProcessStatus, Program,
    ProgramAudio, ProgramGenre, ProgramRelatedItem, ProgramSeries, ProgramVideo,
    ProgramsListOptions, RestartResponse, ServerConfig, Service, ServicesListOptions, Status,
    TimerAccuracy, TunerConfig, TunerDevice, TunerProcess, TunerUser, Version,
    VersionUpdateOptions,
};
pub use stream::{ByteStream, EventStream};
pub use timestamp::Timestamp;
pub use transport::{DEFAULT_USER_AGENT, TransportConfig};
