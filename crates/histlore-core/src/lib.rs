pub mod aggregate;
pub mod canon;
pub mod diff;
pub mod event;
pub mod filter;
pub mod parse;
pub mod sanitize;
pub mod shape;
pub mod signature;
pub mod snapshot;
pub mod state;
pub mod tokenize;

/// Schema version written into snapshots, plans, and persisted state.
pub const SCHEMA_VERSION: &str = "0.1";
