//! Per-feed processing stages: retrieval, parsing, validation,
//! normalization.
//!
//! Each stage is a function returning a success/failure value; the
//! pipeline composes them with early return. The stages share nothing
//! across sources — a raw document and its tree live and die inside
//! one source's run.
//!
//! - [`fetcher`] - One bounded HTTP GET per source
//! - [`xml`] - Generic order-preserving tree over `quick-xml` events
//! - [`validate`] - Minimum `<rss><channel>` structure check
//! - [`normalize`] - Total mapping into the normalized model

pub mod fetcher;
pub mod normalize;
pub mod validate;
pub mod xml;

pub use fetcher::{FetchError, Fetcher, DEFAULT_FETCH_TIMEOUT};
pub use normalize::normalize;
pub use validate::StructureError;
pub use xml::{Node, XmlError};
