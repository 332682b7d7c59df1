//! Mapping from a validated channel node into the normalized model.
//!
//! Normalization is pure and total: given any channel node it produces
//! a [`Podcast`], with every missing optional element becoming `None`.
//! All lookups go through the safe accessors on [`Node`], so there is
//! no failure path to contain — which is why the pipeline's error
//! taxonomy has no "normalize" variant.
//!
//! itunes-prefixed names are matched as literal tag strings, the same
//! way the feeds themselves are written. True namespace resolution is
//! deliberately not attempted.

use crate::feed::xml::Node;
use crate::model::{Episode, Podcast};

/// Extracts show metadata and the ordered episode list from a channel.
///
/// Channel-level single-valued fields use the first occurrence when a
/// sloppy feed repeats them. Categories and items keep document order;
/// both are empty (not absent) when the feed has none.
pub fn normalize(channel: &Node) -> Podcast {
    Podcast {
        title: channel.child_text("title"),
        subtitle: channel.child_text("itunes:subtitle"),
        description: channel.child_text("description"),
        author: channel.child_text("itunes:author"),
        image: channel.child_attr("itunes:image", "href"),
        link: channel.child_text("link"),
        categories: channel
            .children_named("itunes:category")
            .filter_map(|c| c.attr("text"))
            .map(str::to_owned)
            .collect(),
        episodes: channel.children_named("item").map(normalize_item).collect(),
    }
}

fn normalize_item(item: &Node) -> Episode {
    Episode {
        title: item.child_text("title"),
        subtitle: item.child_text("itunes:subtitle"),
        description: item.child_text("itunes:summary"),
        author: item.child_text("itunes:author"),
        image: item.child_attr("itunes:image", "href"),
        link: item.child_text("link"),
        duration: item.child_text("itunes:duration"),
        date: item.child_text("pubDate"),
        file_url: item.child_attr("enclosure", "url"),
        file_type: item.child_attr("enclosure", "type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{validate, xml};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn channel_of(doc: &str) -> Node {
        validate::channel(xml::parse(doc.as_bytes()).unwrap()).unwrap()
    }

    const FULL_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Tech Weekly</title>
    <itunes:subtitle>A show about tech</itunes:subtitle>
    <description>Weekly technology news.</description>
    <itunes:author>Jane Host</itunes:author>
    <itunes:image href="http://cdn/cover.jpg"/>
    <link>http://techweekly.example</link>
    <itunes:category text="Technology"/>
    <itunes:category text="News"/>
    <item>
      <title>Episode 2</title>
      <itunes:subtitle>The second one</itunes:subtitle>
      <itunes:summary>All about parsers.</itunes:summary>
      <itunes:author>Jane Host</itunes:author>
      <itunes:image href="http://cdn/ep2.jpg"/>
      <link>http://techweekly.example/2</link>
      <itunes:duration>45:00</itunes:duration>
      <pubDate>Fri, 08 Mar 2024 10:00:00 GMT</pubDate>
      <enclosure url="http://cdn/ep2.mp3" type="audio/mpeg" length="1234"/>
    </item>
    <item>
      <title>Episode 1</title>
      <enclosure url="http://cdn/ep1.mp3" type="audio/mpeg"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_full_feed_extraction() {
        let podcast = normalize(&channel_of(FULL_FEED));

        assert_eq!(podcast.title.as_deref(), Some("Tech Weekly"));
        assert_eq!(podcast.subtitle.as_deref(), Some("A show about tech"));
        assert_eq!(podcast.description.as_deref(), Some("Weekly technology news."));
        assert_eq!(podcast.author.as_deref(), Some("Jane Host"));
        assert_eq!(podcast.image.as_deref(), Some("http://cdn/cover.jpg"));
        assert_eq!(podcast.link.as_deref(), Some("http://techweekly.example"));
        assert_eq!(podcast.categories, vec!["Technology", "News"]);
        assert_eq!(podcast.episodes.len(), 2);

        let ep = &podcast.episodes[0];
        assert_eq!(ep.title.as_deref(), Some("Episode 2"));
        assert_eq!(ep.subtitle.as_deref(), Some("The second one"));
        assert_eq!(ep.description.as_deref(), Some("All about parsers."));
        assert_eq!(ep.author.as_deref(), Some("Jane Host"));
        assert_eq!(ep.image.as_deref(), Some("http://cdn/ep2.jpg"));
        assert_eq!(ep.link.as_deref(), Some("http://techweekly.example/2"));
        assert_eq!(ep.duration.as_deref(), Some("45:00"));
        assert_eq!(ep.date.as_deref(), Some("Fri, 08 Mar 2024 10:00:00 GMT"));
        assert_eq!(ep.file_url.as_deref(), Some("http://cdn/ep2.mp3"));
        assert_eq!(ep.file_type.as_deref(), Some("audio/mpeg"));
    }

    #[test]
    fn test_minimal_feed() {
        let podcast = normalize(&channel_of(
            r#"<rss><channel>
                 <title>Test Show</title>
                 <item><title>Ep 1</title><enclosure url="http://x/1.mp3"/></item>
               </channel></rss>"#,
        ));

        assert_eq!(podcast.title.as_deref(), Some("Test Show"));
        assert_eq!(podcast.subtitle, None);
        assert_eq!(podcast.description, None);
        assert_eq!(podcast.author, None);
        assert_eq!(podcast.image, None);
        assert_eq!(podcast.link, None);
        assert_eq!(podcast.categories, Vec::<String>::new());

        assert_eq!(podcast.episodes.len(), 1);
        let ep = &podcast.episodes[0];
        assert_eq!(ep.title.as_deref(), Some("Ep 1"));
        assert_eq!(ep.file_url.as_deref(), Some("http://x/1.mp3"));
        assert_eq!(ep.file_type, None);
        assert_eq!(ep.subtitle, None);
        assert_eq!(ep.duration, None);
        assert_eq!(ep.date, None);
    }

    #[test]
    fn test_empty_channel_yields_empty_collections() {
        let podcast = normalize(&channel_of("<rss><channel/></rss>"));
        assert_eq!(podcast, Podcast::default());
        assert!(podcast.categories.is_empty());
        assert!(podcast.episodes.is_empty());
    }

    #[test]
    fn test_episode_order_matches_document_order() {
        let podcast = normalize(&channel_of(
            r#"<rss><channel>
                 <item><title>c</title></item>
                 <item><title>a</title></item>
                 <item><title>b</title></item>
               </channel></rss>"#,
        ));
        let titles: Vec<_> = podcast
            .episodes
            .iter()
            .filter_map(|e| e.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_repeated_single_valued_field_uses_first() {
        let podcast = normalize(&channel_of(
            "<rss><channel><title>First</title><title>Second</title></channel></rss>",
        ));
        assert_eq!(podcast.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_category_without_text_attribute_is_skipped() {
        let podcast = normalize(&channel_of(
            r#"<rss><channel>
                 <itunes:category text="Arts"/>
                 <itunes:category/>
                 <itunes:category text="Comedy"/>
               </channel></rss>"#,
        ));
        assert_eq!(podcast.categories, vec!["Arts", "Comedy"]);
    }

    #[test]
    fn test_idempotent_on_same_tree() {
        let channel = channel_of(FULL_FEED);
        assert_eq!(normalize(&channel), normalize(&channel));
    }

    // Arbitrary small trees for the totality property. Names are drawn
    // from a mix of real feed tags and junk so the extraction paths
    // actually get hit.
    fn arb_node() -> impl Strategy<Value = Node> {
        let name = prop_oneof![
            Just("title".to_string()),
            Just("item".to_string()),
            Just("itunes:image".to_string()),
            Just("itunes:category".to_string()),
            Just("enclosure".to_string()),
            "[a-z]{1,8}",
        ];
        let attrs = proptest::collection::hash_map("[a-z:]{1,6}", ".{0,12}", 0..3);
        let leaf = (name.clone(), attrs.clone(), proptest::option::of(".{0,16}")).prop_map(
            |(name, attributes, text)| Node {
                name,
                attributes,
                children: Vec::new(),
                text,
            },
        );
        leaf.prop_recursive(3, 24, 4, move |inner| {
            (
                name.clone(),
                attrs.clone(),
                proptest::collection::vec(inner, 0..4),
                proptest::option::of(".{0,16}"),
            )
                .prop_map(|(name, attributes, children, text)| Node {
                    name,
                    attributes,
                    children,
                    text,
                })
        })
    }

    proptest! {
        #[test]
        fn normalize_is_total_and_idempotent(channel in arb_node()) {
            let first = normalize(&channel);
            let second = normalize(&channel);
            prop_assert_eq!(first, second);
        }
    }
}
