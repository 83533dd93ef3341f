use serde::{Deserialize, Serialize};

/// These are the remote operations that can be requested of the article service.
///
/// Requests are exchanged as consecutive json values over a TCP connection. The id
/// field is spelled `articleID` on the wire, matching the persisted format.
#[derive(Debug, Serialize, Deserialize)]
pub enum Request {
    /// bulk ingest: announces that [`StreamFrame`]s will follow on this connection
    ///
    /// [`StreamFrame`]: ./enum.StreamFrame.html
    SaveAllArticles,
    /// list the id and title of every stored article
    GetAllArticles,
    /// fetch a single article by id
    GetSpecifiedArticle {
        /// the id to look up
        #[serde(rename = "articleID")]
        article_id: String,
    },
    /// overwrite the title and content of the article with the given id
    UpdateSpecifiedArticle {
        /// the id of the article to update
        #[serde(rename = "articleID")]
        article_id: String,
        /// the replacement title
        title: String,
        /// the replacement content
        content: String,
    },
    /// remove the article with the given id
    RemoveSpecifiedArticle {
        /// the id of the article to remove
        #[serde(rename = "articleID")]
        article_id: String,
    },
}

/// The frames a client sends after a [`Request::SaveAllArticles`]: any number of
/// article blocks followed by exactly one end-of-input marker. A connection that
/// closes before the marker is an aborted stream and nothing gets persisted.
///
/// [`Request::SaveAllArticles`]: ./enum.Request.html#variant.SaveAllArticles
#[derive(Debug, Serialize, Deserialize)]
pub enum StreamFrame {
    /// one raw article block: the title on the first line, the content on the rest
    Block {
        /// the raw block text
        article: String,
    },
    /// end-of-input marker, no more blocks will follow
    End,
}

/// The response types that can be returned for any weblog request.
#[derive(Debug, Serialize, Deserialize)]
pub enum Response {
    /// returned when an operation produced a single human-readable result string.
    /// Business-level failures such as not-found ride in this variant too
    Result {
        /// the outcome of the operation
        result: String,
    },
    /// returned for a get-one request
    Article {
        /// the requested id, echoed back unchanged
        #[serde(rename = "articleID")]
        article_id: String,
        /// the stored title, or the not-found sentinel
        title: String,
        /// the stored content, or the not-found sentinel
        content: String,
    },
    /// returned if an error occurred while processing the request
    Err(String),
}
