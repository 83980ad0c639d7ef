//! Library side of `nd-cli`: argument definitions, command handlers and the
//! file helpers they share.

pub mod cli;
pub mod commands;
pub mod utils;
