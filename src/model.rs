//! Normalized data model for the ingestion pipeline.
//!
//! Every scalar field on [`Podcast`] and [`Episode`] is independently
//! optional — a feed that omits an element produces `None`, never an
//! error. Collections (`categories`, `episodes`) are always present and
//! preserve document order; a feed with zero items yields an empty vec,
//! not an absent one.

use serde::Deserialize;

/// One configured podcast source. Identity is the `url`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Human-readable name used in logs and reports.
    pub name: String,
    /// HTTP(S) URL of the RSS document.
    pub url: String,
}

/// Show-level metadata plus the ordered episode list for one feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Podcast {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    /// itunes category labels, in document order. Empty when the feed
    /// declares none — zero categories is a normal state.
    pub categories: Vec<String>,
    /// Episodes in document order, no re-sorting.
    pub episodes: Vec<Episode>,
}

/// One feed item, normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Episode {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    /// itunes duration string, kept verbatim (e.g. "01:02:03" or "3723").
    pub duration: Option<String>,
    /// pubDate string, kept verbatim — downstream cataloguing decides
    /// how (and whether) to interpret it.
    pub date: Option<String>,
    /// Enclosure media URL.
    pub file_url: Option<String>,
    /// Enclosure MIME type.
    pub file_type: Option<String>,
}

/// Outcome of processing one configured source.
///
/// A batch run produces exactly one of these per source, in configured
/// order. A source that fails at any stage yields a single `Failure`,
/// never a partial `Success`.
#[derive(Debug)]
pub enum IngestOutcome {
    Success {
        source: SourceConfig,
        podcast: Podcast,
    },
    Failure {
        source: SourceConfig,
        reason: crate::pipeline::IngestFailure,
    },
}

impl IngestOutcome {
    /// The source this outcome belongs to.
    pub fn source(&self) -> &SourceConfig {
        match self {
            IngestOutcome::Success { source, .. } => source,
            IngestOutcome::Failure { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, IngestOutcome::Success { .. })
    }
}
