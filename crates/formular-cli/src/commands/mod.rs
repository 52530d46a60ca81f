//! CLI command implementations

pub mod init;
pub mod preview;
pub mod run;
pub mod validate;
