//! The article data model and the raw-text parsing used by bulk ingest.

use serde::{Deserialize, Serialize};

/// A single stored article.
///
/// The `article_id` is assigned by the server when the article is first ingested and
/// never changes afterwards. On the wire and on disk the id field is spelled
/// `articleID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// unique id, server assigned at creation time
    #[serde(rename = "articleID")]
    pub article_id: String,
    /// the first line of the submitted text
    pub title: String,
    /// everything after the first line of the submitted text, may span multiple lines
    pub content: String,
}

/// The full article collection, in insertion order. Persisted as a single json array.
pub type Articles = Vec<Article>;

impl Article {
    /// builds an `Article` from one raw text block.
    ///
    /// The block is split on its first newline: the text before it becomes the title
    /// and the text after it becomes the content. A block without a newline becomes a
    /// title with empty content.
    pub fn from_block(article_id: String, block: &str) -> Article {
        match block.split_once('\n') {
            Some((title, content)) => Article {
                article_id,
                title: title.to_string(),
                content: content.to_string(),
            },
            None => Article {
                article_id,
                title: block.to_string(),
                content: String::new(),
            },
        }
    }
}

/// splits raw text into article blocks.
///
/// Blocks are groups of consecutive non-empty lines separated by one or more blank
/// lines. The lines of a block are re-joined with `\n`, so a block keeps its interior
/// newlines. Runs of blank lines never produce empty blocks. CRLF line endings are
/// tolerated and normalized to `\n`.
pub fn blocks_from_text(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}
