//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; schedulers rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Run completed. Per-source and per-message failures are    |
//! |      | logged, not surfaced here.                                |
//! | 1    | Runtime error: the JSON report could not be produced.     |
//! | 2    | Usage error: bad arguments, unreadable or invalid config. |

/// Success - the run completed (individual failures are in the log).
pub const EXIT_SUCCESS: u8 = 0;

/// Runtime error - the run finished but its report could not be produced.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable or invalid config file.
pub const EXIT_USAGE: u8 = 2;
