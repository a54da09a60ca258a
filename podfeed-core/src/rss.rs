//! RSS 2.0 wire model
//!
//! Serde mirror of the subset of RSS 2.0 that Podfeed emits. The same types
//! deserialize a document back, which is how consumers and tests read feeds.

use serde::{Deserialize, Serialize};

use crate::feed::{FeedEnvelope, FeedError};
use crate::item::FeedItem;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const RSS_VERSION: &str = "2.0";

/// `<rss>` root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "rss")]
pub struct RssDocument {
    #[serde(rename = "@version")]
    pub version: String,
    pub channel: RssChannel,
}

/// `<channel>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssChannel {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        rename = "managingEditor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub managing_editor: Option<String>,
    #[serde(rename = "pubDate", default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    #[serde(rename = "item", default)]
    pub items: Vec<RssItem>,
}

/// `<item>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssItem {
    pub title: String,
    pub link: String,
    /// Always written, empty when the item has no description
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosure: Option<RssEnclosure>,
}

/// `<enclosure/>` element, attributes only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssEnclosure {
    #[serde(rename = "@url")]
    pub url: String,
    #[serde(rename = "@length")]
    pub length: u64,
    #[serde(rename = "@type")]
    pub mime_type: String,
}

impl From<&FeedItem> for RssItem {
    fn from(item: &FeedItem) -> Self {
        Self {
            title: item.title.clone(),
            link: item.link.clone(),
            description: String::new(),
            enclosure: item.enclosure.as_ref().map(|enclosure| RssEnclosure {
                url: enclosure.url.clone(),
                length: enclosure.length,
                mime_type: enclosure.mime_type.clone(),
            }),
        }
    }
}

impl From<&FeedEnvelope> for RssDocument {
    fn from(feed: &FeedEnvelope) -> Self {
        let managing_editor = Some(feed.author.clone()).filter(|author| !author.is_empty());

        Self {
            version: RSS_VERSION.to_string(),
            channel: RssChannel {
                title: feed.title.clone(),
                link: feed.link.clone(),
                description: feed.description.clone(),
                managing_editor,
                pub_date: Some(feed.created.to_rfc2822()),
                items: feed.items.iter().map(RssItem::from).collect(),
            },
        }
    }
}

impl RssDocument {
    /// Serialize to an indented XML string with declaration.
    ///
    /// # Errors
    ///
    /// - `FeedError::Serialize` - If the XML writer rejects the document
    pub fn to_xml(&self) -> Result<String, FeedError> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut body);
        serializer.indent(' ', 2);
        self.serialize(serializer)?;

        Ok(format!("{XML_DECLARATION}\n{body}\n"))
    }

    /// Parse an RSS document produced by [`RssDocument::to_xml`] or any
    /// compatible RSS 2.0 feed.
    ///
    /// # Errors
    ///
    /// - `FeedError::Parse` - If the input is not a readable RSS document
    pub fn parse(xml: &str) -> Result<Self, FeedError> {
        Ok(quick_xml::de::from_str(xml)?)
    }
}
