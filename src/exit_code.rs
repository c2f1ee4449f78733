//! Process exit statuses, following the BSD `sysexits` numbering.

pub const OK: i32 = 0;

/// Malformed command line, e.g. more than one script path.
pub const USAGE: i32 = 64;

pub const COMPILE_ERROR: i32 = 65;

pub const RUNTIME_ERROR: i32 = 70;

/// A script could not be read.
pub const IO_ERROR: i32 = 74;
