// ABOUTME: Command implementations exposed by the CLI
// ABOUTME: Exports the diff command and its stream-level building blocks

pub mod diff;

pub use diff::{diff, diff_clients, diff_streams};
