//! Reporting sink for batch outcomes.
//!
//! The pipeline does not own a log destination or a library builder;
//! it emits exactly one success or failure event per source to an
//! injected [`ResultSink`]. That keeps the core testable without a
//! real log destination and lets downstream cataloguing plug in
//! without touching pipeline code.

use crate::model::{Podcast, SourceConfig};
use crate::pipeline::IngestFailure;

/// Capability to accept per-source outcomes, once per source, in
/// processing order.
pub trait ResultSink {
    fn record_success(&mut self, source: &SourceConfig, podcast: &Podcast);
    fn record_failure(&mut self, source: &SourceConfig, reason: &IngestFailure);
}

/// Sink that reports outcomes through `tracing`.
///
/// Retrieval failures are warnings — remote servers flake, that is an
/// expected degraded outcome. Parse and structure failures are errors:
/// the server answered, but with something that is not a usable feed.
#[derive(Debug, Default)]
pub struct LogSink;

impl ResultSink for LogSink {
    fn record_success(&mut self, source: &SourceConfig, podcast: &Podcast) {
        tracing::info!(
            source = %source.name,
            title = podcast.title.as_deref().unwrap_or("<untitled>"),
            episodes = podcast.episodes.len(),
            "Feed ingested"
        );
    }

    fn record_failure(&mut self, source: &SourceConfig, reason: &IngestFailure) {
        match reason {
            IngestFailure::Retrieval(e) => {
                tracing::warn!(source = %source.name, url = %source.url, error = %e, "Feed retrieval failed");
            }
            IngestFailure::Parse(e) => {
                tracing::error!(source = %source.name, url = %source.url, error = %e, "Feed is not well-formed XML");
            }
            IngestFailure::Structure(e) => {
                tracing::error!(source = %source.name, url = %source.url, error = %e, "Feed lacks channel structure");
            }
        }
    }
}

/// Sink that collects outcome summaries in memory.
///
/// Used by tests and by any caller that wants to inspect results after
/// the batch instead of streaming them to a log.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<SinkEvent>,
}

/// Flattened record of one sink event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Success { source_name: String, title: Option<String>, episode_count: usize },
    Failure { source_name: String, kind: FailureKind, message: String },
}

/// Failure classification carried on [`SinkEvent::Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Retrieval,
    Parse,
    Structure,
}

impl ResultSink for MemorySink {
    fn record_success(&mut self, source: &SourceConfig, podcast: &Podcast) {
        self.events.push(SinkEvent::Success {
            source_name: source.name.clone(),
            title: podcast.title.clone(),
            episode_count: podcast.episodes.len(),
        });
    }

    fn record_failure(&mut self, source: &SourceConfig, reason: &IngestFailure) {
        let kind = match reason {
            IngestFailure::Retrieval(_) => FailureKind::Retrieval,
            IngestFailure::Parse(_) => FailureKind::Parse,
            IngestFailure::Structure(_) => FailureKind::Structure,
        };
        self.events.push(SinkEvent::Failure {
            source_name: source.name.clone(),
            kind,
            message: reason.to_string(),
        });
    }
}
