//! Terminal front end for the wardrobe: one-shot subcommands plus an
//! interactive shell that keeps the per-session state (current suggestion,
//! selection, assistant conversation).

pub mod cmd;
pub mod output;
pub mod root;
pub mod shell;
