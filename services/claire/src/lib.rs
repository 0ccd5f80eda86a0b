//! Claire Service Library Crate
//!
//! Front-end plumbing around `claire-core`: command-line arguments, logging
//! setup, and the interactive terminal loop. `main.rs` is a thin wrapper.

pub mod cli;
pub mod logging;
pub mod terminal;
