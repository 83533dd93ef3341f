//! This module provides the article record store.
//!
//! The store owns loading and saving of the full article collection against
//! persistent storage. There is one implementation, [`JsonArticleStore`], which
//! keeps the whole collection in a single json file. The [`ArticleStore`] trait is
//! the seam that lets the service and the tests be written against the storage
//! contract instead of the file layout.
//!
//! [`JsonArticleStore`]: ./struct.JsonArticleStore.html
//! [`ArticleStore`]: ./trait.ArticleStore.html

use crate::article::{Article, Articles};
use crate::Result;

/// A trait for the basic functionality of an article record store.
///
/// Implementations are cheap to clone so that every worker thread can hold its own
/// handle to the same underlying storage.
pub trait ArticleStore: Clone + Send + 'static {
    /// loads the full article collection from persistent storage.
    ///
    /// If the backing storage does not exist yet, it is first created holding the
    /// empty collection.
    ///
    /// # Errors
    /// returns a fatal error if the storage could not be created, read or decoded
    fn load(&self) -> Result<Articles>;

    /// persists the full article collection, replacing whatever was stored before.
    ///
    /// # Errors
    /// returns a fatal error if the collection could not be encoded or written
    fn save(&self, articles: &Articles) -> Result<()>;
}

/// returns the index of the first article whose id equals `article_id`, or `None` if
/// no article matches. A linear scan in storage order.
pub fn find_by_id(articles: &[Article], article_id: &str) -> Option<usize> {
    articles
        .iter()
        .position(|article| article.article_id == article_id)
}

mod json;

pub use self::json::JsonArticleStore;
