//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Description                                         |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (unspecified)                         |
//! | 2    | CLI usage error (bad args, bad filter value)        |
//! | 3    | I/O error (cannot read input, cannot write output)  |
//! | 4    | Invalid config (TOML parse or validation failure)   |
//! | 5    | Upload unusable, default dataset in use (`--strict`)|

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file unreadable, undecodable, or output not writable.
pub const EXIT_IO: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// The upload could not be reconciled and `--strict` was given.
/// Output is still written; it describes the default dataset.
pub const EXIT_DEFAULT_DATA: u8 = 5;
