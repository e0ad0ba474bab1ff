//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - an artifact or subscription is malformed
pub const VALIDATION_ERROR: i32 = 2;

/// Resolve error - recursion or an artifact that cannot be built
pub const RESOLVE_ERROR: i32 = 3;

/// Fetch error - a definition, repository or catalog entry could not be read
pub const FETCH_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
