//! Foundation utilities shared by the repoglance crates: error types, exit
//! codes, logging setup, canonical JSON emission and the `FileRecord` type.

pub mod canonicalization;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
