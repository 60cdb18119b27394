//! Word-frequency extraction and aggregation for publication corpora.
//!
//! Two independent halves:
//! - the ingest pipeline (`manifest` -> `fetch` -> `extract` -> `pipeline`),
//!   which turns publication PDFs into word-count records, and
//! - the aggregation layer (`aggregate` over a `store::WordStore`), which
//!   answers the statistics, occurrence, and time-series queries a dashboard
//!   front end renders.
//!
//! Stores: local SQLite (`db::Database`) or a remote document store
//! (`remote::RemoteStore`, served by `http_server`).

pub mod aggregate;
pub mod db;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod http_server;
pub mod manifest;
pub mod pipeline;
pub mod remote;
pub mod stopwords;
pub mod store;
pub mod utils;

pub use db::Database;
pub use store::WordStore;
