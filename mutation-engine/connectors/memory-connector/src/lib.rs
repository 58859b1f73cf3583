//! A connector keeping all records in process memory. Used by the CLI and by tests.

mod connection;
mod connector;
mod filter;
mod operations;
mod seed;
mod store;

pub use connection::InMemoryConnection;
pub use connector::InMemoryConnector;
