//! Core of the presubmit runner: how checks are declared, filtered,
//! composed into programs and executed.
//!
//! Nothing here knows about specific tools; concrete checks live in
//! [`crate::plugins`].

pub mod changes;
pub mod check;
pub mod config;
pub mod environment;
pub mod error;
pub mod filter;
pub mod hook;
pub mod orchestrator;
pub mod output;
pub mod process;
pub mod program;
