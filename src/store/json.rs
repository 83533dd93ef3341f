use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::ArticleStore;
use crate::article::Articles;
use crate::error::{Result, WeblogError};

/// The file-backed [`ArticleStore`].
///
/// The entire collection lives in one json file: an array of article objects,
/// pretty-printed with two-space indentation. Every load re-reads and re-decodes the
/// whole file and every save re-encodes and overwrites it in place, so the file is
/// the single source of truth and nothing is cached between operations.
///
/// Handles are cheap to clone, all clones share the same backing path.
///
/// [`ArticleStore`]: ./trait.ArticleStore.html
#[derive(Debug, Clone)]
pub struct JsonArticleStore {
    // path of the json file holding the article collection
    path: Arc<PathBuf>,
}

impl JsonArticleStore {
    /// creates a store backed by the json file at `path`.
    /// Missing parent directories are created here; the file itself is not created
    /// until the first load or save touches it.
    ///
    /// # Errors
    /// returns [`WeblogError::Storage`] if the parent directories could not be created
    ///
    /// [`WeblogError::Storage`]: ../enum.WeblogError.html#variant.Storage
    pub fn open(path: impl Into<PathBuf>) -> Result<JsonArticleStore> {
        let path = path.into();
        info!("opening article store version {}", env!("CARGO_PKG_VERSION"));
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(WeblogError::Storage)?;
        }
        debug!("article file path = {:?}", &path);

        Ok(JsonArticleStore {
            path: Arc::new(path),
        })
    }

    /// the path of the backing json file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArticleStore for JsonArticleStore {
    fn load(&self) -> Result<Articles> {
        // first touch creates the file holding the empty-array encoding
        if !self.path.exists() {
            info!("creating article file {:?}", &self.path);
            fs::write(self.path(), b"[]").map_err(WeblogError::Storage)?;
        }

        let file = File::open(self.path()).map_err(WeblogError::Storage)?;
        let articles: Articles =
            serde_json::from_reader(BufReader::new(file)).map_err(WeblogError::Codec)?;
        debug!("loaded {} articles from {:?}", articles.len(), &self.path);
        Ok(articles)
    }

    fn save(&self, articles: &Articles) -> Result<()> {
        let file = File::create(self.path()).map_err(WeblogError::Storage)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, articles).map_err(WeblogError::Codec)?;
        writer.flush().map_err(WeblogError::Storage)?;
        debug!("saved {} articles to {:?}", articles.len(), &self.path);
        Ok(())
    }
}
