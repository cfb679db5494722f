//! Verbosity-gated logging macros for the matcher.
//!
//! Output goes to stderr so the rendered report on stdout stays clean.
//! - 0: SILENT (nothing)
//! - 1: CHANGES (each assignment, run summary)
//! - 2: CHECKS (per-iteration winner and candidate counts)
//! - 3: DEBUG (per-person weight vectors)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Name of a verbosity level, for the CLI banner.
pub fn level_name(verbosity: u8) -> &'static str {
    match verbosity {
        VERBOSITY_SILENT => "silent",
        VERBOSITY_CHANGES => "changes",
        VERBOSITY_CHECKS => "checks",
        _ => "debug",
    }
}

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
