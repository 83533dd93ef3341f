use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::article::{Article, Articles};
use crate::error::Result;
use crate::id;
use crate::logger::{AccessLog, ErrorLog};
use crate::store::{self, ArticleStore};

// operation names used in access and error log lines
const SAVE_ALL_ARTICLES: &str = "SaveAllArticles";
const GET_ALL_ARTICLES: &str = "GetAllArticles";
const GET_SPECIFIED_ARTICLE: &str = "GetSpecifiedArticle";
const UPDATE_SPECIFIED_ARTICLE: &str = "UpdateSpecifiedArticle";
const REMOVE_SPECIFIED_ARTICLE: &str = "RemoveSpecifiedArticle";

// user-visible result strings
const ARTICLES_SAVED: &str = "articles saved";
const EMPTY_INGEST: &str = "empty file, nothing saved";
const NO_ARTICLES: &str = "no articles available";
const TITLE_NOT_FOUND: &str = "title not found";
const CONTENT_NOT_FOUND: &str = "content not found";

/// The article service: the five remote operations executed against an
/// [`ArticleStore`].
///
/// Every operation is a stateless transaction. It loads the full collection fresh
/// from the store, performs its logic, and (for mutating operations) writes the full
/// collection back; nothing is cached between calls. A single internal gate
/// serializes the load-mutate-save span across worker threads so concurrent writers
/// cannot lose each other's updates.
///
/// Each operation also writes one line to the access log naming the caller, the
/// operation and a short parameter summary. Business-level failures (not-found,
/// empty ingest) write a notable line to the error log and are reported inside the
/// result string, never as an `Err`.
///
/// [`ArticleStore`]: ./store/trait.ArticleStore.html
#[derive(Clone)]
pub struct ArticleService<S: ArticleStore> {
    store: S,
    access_log: AccessLog,
    error_log: ErrorLog,
    // serializes the load-mutate-save span of all operations
    gate: Arc<Mutex<()>>,
}

impl<S: ArticleStore> ArticleService<S> {
    /// creates a service over the given store and log sinks
    pub fn new(store: S, access_log: AccessLog, error_log: ErrorLog) -> Self {
        ArticleService {
            store,
            access_log,
            error_log,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Bulk ingest: consumes a stream of raw article blocks and appends them to the
    /// store in one batch.
    ///
    /// Each non-empty block is split on its first newline into title and content and
    /// gets a freshly generated id. When the stream ends the whole batch is persisted
    /// with a single save. If nothing was received the store is left untouched and
    /// the empty-result message is returned instead.
    ///
    /// # Errors
    /// an `Err` block aborts the ingest: a fatal line is written to the error log,
    /// nothing is saved, and the error is returned to the caller
    pub fn save_all_articles<I>(&self, peer: &str, blocks: I) -> Result<String>
    where
        I: IntoIterator<Item = Result<String>>,
    {
        debug!("{} invoked by {}", SAVE_ALL_ARTICLES, peer);

        // drain the stream before touching the store, a slow client must not
        // hold the gate
        let mut received: Vec<String> = Vec::new();
        let mut detail = String::new();
        for block in blocks {
            let block = match block {
                Ok(block) => block,
                Err(e) => {
                    self.error_log.fatal(
                        peer,
                        SAVE_ALL_ARTICLES,
                        "error while reading the client stream",
                        &e,
                    );
                    return Err(e);
                }
            };
            if block.is_empty() {
                continue;
            }
            detail.push_str(&block);
            received.push(block);
        }

        if received.is_empty() {
            self.error_log.notable(peer, SAVE_ALL_ARTICLES, EMPTY_INGEST);
            self.access_log.record(peer, SAVE_ALL_ARTICLES, &detail);
            return Ok(EMPTY_INGEST.to_string());
        }

        let _gate = self.lock_gate();
        let mut articles = self.load_articles(peer, SAVE_ALL_ARTICLES)?;
        for block in &received {
            let article = Article::from_block(id::generate(), block);
            debug!("ingesting article {}", article.article_id);
            articles.push(article);
        }
        self.save_articles(peer, SAVE_ALL_ARTICLES, &articles)?;

        self.access_log.record(peer, SAVE_ALL_ARTICLES, &detail);
        Ok(ARTICLES_SAVED.to_string())
    }

    /// lists the id and title of every stored article, one block per article in
    /// storage order. An empty store yields the empty-result message instead.
    pub fn get_all_articles(&self, peer: &str) -> Result<String> {
        debug!("{} invoked by {}", GET_ALL_ARTICLES, peer);

        let _gate = self.lock_gate();
        let articles = self.load_articles(peer, GET_ALL_ARTICLES)?;

        let result = if articles.is_empty() {
            self.error_log.notable(peer, GET_ALL_ARTICLES, NO_ARTICLES);
            NO_ARTICLES.to_string()
        } else {
            let mut listing = String::new();
            for article in &articles {
                listing.push_str(&format!(
                    "\narticleID: {}\ntitle: {}\n",
                    article.article_id, article.title
                ));
            }
            listing
        };

        self.access_log.record(peer, GET_ALL_ARTICLES, "");
        Ok(result)
    }

    /// fetches the article with the given id.
    ///
    /// If no article matches, the requested id is echoed back with the not-found
    /// sentinels in place of title and content.
    pub fn get_specified_article(&self, peer: &str, article_id: String) -> Result<Article> {
        debug!("{} invoked by {} for {}", GET_SPECIFIED_ARTICLE, peer, article_id);

        let _gate = self.lock_gate();
        let articles = self.load_articles(peer, GET_SPECIFIED_ARTICLE)?;

        let article = match store::find_by_id(&articles, &article_id) {
            Some(idx) => articles[idx].clone(),
            None => {
                self.error_log.notable(
                    peer,
                    GET_SPECIFIED_ARTICLE,
                    &format!("article {} not found", article_id),
                );
                Article {
                    article_id,
                    title: TITLE_NOT_FOUND.to_string(),
                    content: CONTENT_NOT_FOUND.to_string(),
                }
            }
        };

        self.access_log.record(
            peer,
            GET_SPECIFIED_ARTICLE,
            &format!("articleID={}", article.article_id),
        );
        Ok(article)
    }

    /// overwrites the title and content of the article with the given id and
    /// persists the collection. A missing id reports the not-found message and saves
    /// nothing.
    pub fn update_specified_article(
        &self,
        peer: &str,
        article_id: String,
        title: String,
        content: String,
    ) -> Result<String> {
        debug!(
            "{} invoked by {} for {}",
            UPDATE_SPECIFIED_ARTICLE, peer, article_id
        );

        let _gate = self.lock_gate();
        let mut articles = self.load_articles(peer, UPDATE_SPECIFIED_ARTICLE)?;

        let result = match store::find_by_id(&articles, &article_id) {
            Some(idx) => {
                articles[idx].title = title;
                articles[idx].content = content;
                self.save_articles(peer, UPDATE_SPECIFIED_ARTICLE, &articles)?;
                format!("article {} updated", article_id)
            }
            None => {
                let result = format!("article {} not found", article_id);
                self.error_log
                    .notable(peer, UPDATE_SPECIFIED_ARTICLE, &result);
                result
            }
        };

        self.access_log.record(
            peer,
            UPDATE_SPECIFIED_ARTICLE,
            &format!("articleID={}", article_id),
        );
        Ok(result)
    }

    /// removes the article with the given id, preserving the relative order of the
    /// remaining articles, and persists the collection. A missing id reports the
    /// not-found message and saves nothing.
    pub fn remove_specified_article(&self, peer: &str, article_id: String) -> Result<String> {
        debug!(
            "{} invoked by {} for {}",
            REMOVE_SPECIFIED_ARTICLE, peer, article_id
        );

        let _gate = self.lock_gate();
        let mut articles = self.load_articles(peer, REMOVE_SPECIFIED_ARTICLE)?;

        let result = match store::find_by_id(&articles, &article_id) {
            Some(idx) => {
                articles.remove(idx);
                self.save_articles(peer, REMOVE_SPECIFIED_ARTICLE, &articles)?;
                format!("article {} removed", article_id)
            }
            None => {
                let result = format!("article {} not found", article_id);
                self.error_log
                    .notable(peer, REMOVE_SPECIFIED_ARTICLE, &result);
                result
            }
        };

        self.access_log.record(
            peer,
            REMOVE_SPECIFIED_ARTICLE,
            &format!("articleID={}", article_id),
        );
        Ok(result)
    }

    // loads the collection, writing a fatal line to the error log on failure
    fn load_articles(&self, peer: &str, operation: &str) -> Result<Articles> {
        self.store.load().map_err(|e| {
            self.error_log
                .fatal(peer, operation, "could not load the article file", &e);
            e
        })
    }

    // saves the collection, writing a fatal line to the error log on failure
    fn save_articles(&self, peer: &str, operation: &str, articles: &Articles) -> Result<()> {
        self.store.save(articles).map_err(|e| {
            self.error_log
                .fatal(peer, operation, "could not save the article file", &e);
            e
        })
    }

    // a poisoned gate means a worker panicked mid-operation; the file on disk is
    // still a complete save, so later operations carry on
    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        match self.gate.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
