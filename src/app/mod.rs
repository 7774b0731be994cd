//! Process wiring for the CLI: logging setup and the run sequence.

pub(crate) mod runtime;
pub(crate) mod terminal;
