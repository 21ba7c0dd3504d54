// ABOUTME: PostgreSQL access module
// ABOUTME: Exports connection management and the catalog metadata streams

pub mod catalog;
pub mod connection;

pub use catalog::{metadata_query, stream_rows};
pub use connection::{connect, connect_with_retry};
