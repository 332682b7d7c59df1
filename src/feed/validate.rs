//! Structural validation of parsed feed documents.
//!
//! A document can be perfectly well-formed XML and still not be a
//! usable feed. That case is reported as a [`StructureError`], kept
//! distinct from a parse error so diagnostics can tell "broken XML"
//! apart from "valid XML, wrong shape".

use crate::feed::xml::Node;
use thiserror::Error;

/// The parsed document lacks the minimum `<rss><channel>` structure.
#[derive(Debug, Error)]
pub enum StructureError {
    /// Root element is not `<rss>`.
    #[error("Root element is <{0}>, expected <rss>")]
    NotRss(String),

    /// `<rss>` root contains no `<channel>` element.
    #[error("Feed has no <channel> element")]
    NoChannel,
}

/// Confirms the tree is an RSS feed and extracts its first channel.
///
/// The channel node is taken by value — the rest of the tree is
/// discarded here, which is fine: everything the normalizer reads
/// lives under the channel.
pub fn channel(tree: Node) -> Result<Node, StructureError> {
    if tree.name != "rss" {
        return Err(StructureError::NotRss(tree.name));
    }
    let mut children = tree.children;
    match children.iter().position(|c| c.name == "channel") {
        Some(idx) => Ok(children.swap_remove(idx)),
        None => Err(StructureError::NoChannel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::xml;

    #[test]
    fn test_minimal_rss_accepted() {
        let tree = xml::parse(b"<rss version=\"2.0\"><channel/></rss>").unwrap();
        let channel = channel(tree).unwrap();
        assert_eq!(channel.name, "channel");
    }

    #[test]
    fn test_first_channel_returned() {
        let tree =
            xml::parse(b"<rss><channel><title>One</title></channel><channel><title>Two</title></channel></rss>")
                .unwrap();
        let ch = channel(tree).unwrap();
        assert_eq!(ch.child_text("title").as_deref(), Some("One"));
    }

    #[test]
    fn test_non_rss_root_rejected() {
        let tree = xml::parse(b"<html><body/></html>").unwrap();
        assert!(matches!(channel(tree), Err(StructureError::NotRss(name)) if name == "html"));
    }

    #[test]
    fn test_rss_without_channel_rejected() {
        let tree = xml::parse(b"<rss version=\"2.0\"><other/></rss>").unwrap();
        assert!(matches!(channel(tree), Err(StructureError::NoChannel)));
    }
}
