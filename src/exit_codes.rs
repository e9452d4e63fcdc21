//! Exit code constants for the swarmctl CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown identifiers)
//! - 2: Validation failure (config, scan profile, script manifest)
//! - 3: One or more tasks failed during a run
//! - 4: I/O failure (reading or writing files, stdio)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown agent type, unknown task id.
pub const USER_ERROR: i32 = 1;

/// Validation failure: invalid config, scan profile, or script manifest.
pub const VALIDATION_FAILURE: i32 = 2;

/// A scenario run finished with at least one failed task.
pub const TASK_FAILURE: i32 = 3;

/// Filesystem or stdio failure.
pub const IO_FAILURE: i32 = 4;
