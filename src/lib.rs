// ABOUTME: Library module for postgres-schema-diff
// ABOUTME: Exports the merge diff engine, catalog access, and commands for the binary and tests

pub mod commands;
pub mod config;
pub mod diff;
pub mod postgres;
pub mod utils;
