//! Per-source ingestion pipeline and the batch orchestrator.
//!
//! Each source runs fetch → parse → validate → normalize to completion
//! before the next source starts. Sequential processing is a bandwidth
//! courtesy: one in-flight request at a time, toward remote servers
//! and on the caller's own link. Every stage failure is contained at
//! the per-source boundary; the batch always completes with exactly
//! one outcome per configured source, in configured order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::feed::fetcher::{FetchError, Fetcher};
use crate::feed::validate::StructureError;
use crate::feed::xml::XmlError;
use crate::feed::{normalize, validate, xml};
use crate::model::{IngestOutcome, Podcast, SourceConfig};
use crate::sink::ResultSink;

/// Why one source failed to produce a podcast record.
///
/// The variants are mutually exclusive: a source fails at exactly one
/// stage. Normalization is total and contributes no variant.
#[derive(Debug, Error)]
pub enum IngestFailure {
    /// Transport failure, timeout, non-2xx status, or oversized body.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] FetchError),
    /// Document is not well-formed XML.
    #[error("parse failed: {0}")]
    Parse(#[from] XmlError),
    /// Well-formed XML that is not a usable feed.
    #[error("invalid feed structure: {0}")]
    Structure(#[from] StructureError),
}

/// Runs the full pipeline for one source.
///
/// Returns the normalized podcast or the first stage failure; never
/// panics on untrusted input and never partially succeeds.
pub async fn ingest_source(
    fetcher: &Fetcher,
    source: &SourceConfig,
) -> Result<Podcast, IngestFailure> {
    let bytes = fetcher.fetch(&source.url).await?;
    tracing::debug!(source = %source.name, bytes = bytes.len(), "Feed retrieved");

    let tree = xml::parse(&bytes)?;
    let channel = validate::channel(tree)?;
    Ok(normalize::normalize(&channel))
}

/// Processes all sources strictly one at a time, in configured order.
///
/// For each source, exactly one event is emitted to `sink` and one
/// [`IngestOutcome`] is collected, both in processing order. A failure
/// on one source never affects any other source.
///
/// The `stop` flag is the external cancellation signal. It is checked
/// between sources only — an in-flight fetch always completes or fails
/// on its own terms before the batch halts. A halted batch returns the
/// outcomes gathered so far.
pub async fn run_batch<S: ResultSink>(
    fetcher: &Fetcher,
    sources: &[SourceConfig],
    sink: &mut S,
    stop: &Arc<AtomicBool>,
) -> Vec<IngestOutcome> {
    let mut outcomes = Vec::with_capacity(sources.len());

    for source in sources {
        if stop.load(Ordering::Relaxed) {
            tracing::info!(
                processed = outcomes.len(),
                total = sources.len(),
                "Stop requested, halting batch between sources"
            );
            break;
        }

        let outcome = match ingest_source(fetcher, source).await {
            Ok(podcast) => {
                sink.record_success(source, &podcast);
                IngestOutcome::Success {
                    source: source.clone(),
                    podcast,
                }
            }
            Err(reason) => {
                sink.record_failure(source, &reason);
                IngestOutcome::Failure {
                    source: source.clone(),
                    reason,
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}
