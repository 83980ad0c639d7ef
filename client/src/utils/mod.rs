//! Pure helpers shared by stores, hooks and the CLI.

pub mod helpers;
pub mod validation;
