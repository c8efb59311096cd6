//! Error codes and exit status for esrowsctl

use esrows_common::NormalizeError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors (I/O, config)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the dialect is unknown
pub const EXIT_USAGE: i32 = 64;

/// Exit code when the response cannot be normalized
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Map a failure to the process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<NormalizeError>() {
        Some(NormalizeError::UnsupportedDialect(_)) => EXIT_USAGE,
        Some(_) => EXIT_INVALID_RESPONSE,
        None => EXIT_GENERAL_ERROR,
    }
}
