//! podshelf — builds a normalized podcast catalogue from configured
//! RSS feed sources.
//!
//! The library is the ingestion pipeline: per-source retrieval,
//! defensive XML parsing into a generic tree, structural validation,
//! and total normalization into [`model::Podcast`] records, with
//! per-source fault containment so one bad feed never aborts a batch.
//! The binary in `main.rs` adds the boilerplate around it: config
//! loading, log setup, and the Ctrl-C stop signal.

pub mod config;
pub mod feed;
pub mod model;
pub mod pipeline;
pub mod sink;

pub use config::Config;
pub use model::{Episode, IngestOutcome, Podcast, SourceConfig};
pub use pipeline::{ingest_source, run_batch, IngestFailure};
pub use sink::{LogSink, MemorySink, ResultSink};
