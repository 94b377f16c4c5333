//! Stderr logging bootstrap.
//!
//! Library crates only emit through the `log` facade; this is the single
//! place a backend is installed. stdout stays reserved for `--json` output.

use flexi_logger::{Logger, LoggerHandle};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Start the stderr logger. `RUST_LOG` wins over `level` when set.
///
/// The returned handle must be kept alive for the life of the process.
pub fn init_logging(level: &str) -> Result<LoggerHandle, String> {
    Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}
