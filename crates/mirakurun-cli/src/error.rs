//! CLI error types with miette diagnostics.
//!
//! Maps client and config errors into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use mirakurun_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach Mirakurun at {url}")]
    #[diagnostic(
        code(mirakurun::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             URL: {url}\n\
             Try: mirakurun --url http://<host>:40772/api/ status"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: mirakurun_api::Error,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(mirakurun::timeout),
        help("Increase the deadline with --timeout, or pass --timeout 0 for streams.")
    )]
    Timeout {
        #[source]
        source: mirakurun_api::Error,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(mirakurun::not_found),
        help("Run: mirakurun {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(mirakurun::api_error))]
    Api(mirakurun_api::Error),

    #[error("Server did not send an MPEG-TS stream (got {actual})")]
    #[diagnostic(
        code(mirakurun::not_a_stream),
        help("The tuner may be busy or the service unavailable; try a higher --priority.")
    )]
    NotAStream { actual: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mirakurun::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mirakurun::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mirakurun config set-profile {name} --url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(mirakurun::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(mirakurun::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(mirakurun::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Api(e) if e.is_not_found() => exit_code::NOT_FOUND,
            Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Turn a 404 from a lookup into a `NotFound` pointing at the list command.
    pub fn not_found_as(
        err: mirakurun_api::Error,
        resource_type: &str,
        identifier: impl ToString,
        list_command: &str,
    ) -> Self {
        if err.is_not_found() {
            Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.to_string(),
                list_command: list_command.into(),
            }
        } else {
            err.into()
        }
    }
}

// ── mirakurun_api::Error → CliError mapping ──────────────────────────

impl From<mirakurun_api::Error> for CliError {
    fn from(err: mirakurun_api::Error) -> Self {
        use mirakurun_api::Error as ApiError;

        match err {
            e if e.is_timeout() => CliError::Timeout { source: e },
            ApiError::Transport(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: ApiError::Transport(e),
            },
            ApiError::ContentType { actual, .. } => CliError::NotAStream { actual },
            ApiError::Configuration { message } => CliError::Validation {
                field: "url".into(),
                reason: message,
            },
            ApiError::Io(e) => CliError::Io(e),
            other => CliError::Api(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Client(e) => e.into(),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_404_exits_not_found() {
        let err: CliError = mirakurun_api::Error::Api {
            status: 404,
            message: "404 Not Found".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn lookup_404_becomes_not_found_with_hint() {
        let err = CliError::not_found_as(
            mirakurun_api::Error::Api {
                status: 404,
                message: "404 Not Found".into(),
            },
            "service",
            3_239_123_608_u64,
            "services list",
        );
        assert!(matches!(err, CliError::NotFound { ref identifier, .. } if identifier == "3239123608"));
    }

    #[test]
    fn content_type_mismatch_is_reported_as_not_a_stream() {
        let err: CliError = mirakurun_api::Error::ContentType {
            expected: "video/MP2T",
            actual: "application/json".into(),
        }
        .into();
        assert!(matches!(err, CliError::NotAStream { .. }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn bad_url_is_a_usage_error() {
        let err: CliError = ConfigError::Validation {
            field: "url".into(),
            reason: "expected http or https".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
