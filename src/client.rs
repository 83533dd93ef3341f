use std::io::{BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};

use serde::{Deserialize, Serialize};
use serde_json::de::IoRead;
use serde_json::Deserializer;

use crate::article::Article;
use crate::error::{Result, WeblogError};
use crate::protocol::{Request, Response, StreamFrame};

/// `WeblogClient` contains the functionality for communicating with a
/// [`WeblogServer`]. One client owns one TCP connection; the five operations can
/// be issued on it in any order, any number of times.
///
/// [`WeblogServer`]: ./struct.WeblogServer.html
pub struct WeblogClient {
    reader: Deserializer<IoRead<BufReader<TcpStream>>>,
    writer: BufWriter<TcpStream>,
}

impl WeblogClient {
    /// creates a `WeblogClient` and establishes a socket connection to the server
    /// at the given `addr`
    ///
    /// # Errors
    /// returns [`WeblogError::Connection`] if the connection could not be established
    ///
    /// [`WeblogError::Connection`]: ./enum.WeblogError.html#variant.Connection
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let tcp_reader = TcpStream::connect(addr).map_err(WeblogError::Connection)?;
        let tcp_writer = tcp_reader.try_clone().map_err(WeblogError::Connection)?;

        Ok(WeblogClient {
            reader: Deserializer::from_reader(BufReader::new(tcp_reader)),
            writer: BufWriter::new(tcp_writer),
        })
    }

    /// streams the given raw article `blocks` to the server as one bulk ingest
    ///
    /// ## Returns
    /// the server's summary string: either the saved confirmation or the
    /// empty-result message
    pub fn save_all_articles(&mut self, blocks: Vec<String>) -> Result<String> {
        self.send(&Request::SaveAllArticles)?;
        for article in blocks {
            self.send(&StreamFrame::Block { article })?;
        }
        self.send(&StreamFrame::End)?;
        self.read_result()
    }

    /// requests the listing of all stored article ids and titles
    ///
    /// ## Returns
    /// the listing string, or the empty-result message if no articles are stored
    pub fn get_all_articles(&mut self) -> Result<String> {
        self.send(&Request::GetAllArticles)?;
        self.read_result()
    }

    /// fetches the article with the given `article_id` from the server
    ///
    /// ## Returns
    /// the stored article. A missing id comes back with the requested id and the
    /// not-found sentinels in place of title and content
    pub fn get_specified_article(&mut self, article_id: String) -> Result<Article> {
        self.send(&Request::GetSpecifiedArticle { article_id })?;
        match self.read_response()? {
            Response::Article {
                article_id,
                title,
                content,
            } => Ok(Article {
                article_id,
                title,
                content,
            }),
            Response::Err(msg) => Err(WeblogError::Protocol(msg)),
            resp => Err(WeblogError::Protocol(format!(
                "unexpected response: {:?}",
                resp
            ))),
        }
    }

    /// asks the server to overwrite the title and content of the article with the
    /// given `article_id`
    ///
    /// ## Returns
    /// the server's result string, naming the id and whether it was updated
    pub fn update_specified_article(
        &mut self,
        article_id: String,
        title: String,
        content: String,
    ) -> Result<String> {
        self.send(&Request::UpdateSpecifiedArticle {
            article_id,
            title,
            content,
        })?;
        self.read_result()
    }

    /// asks the server to remove the article with the given `article_id`
    ///
    /// ## Returns
    /// the server's result string, naming the id and whether it was removed
    pub fn remove_specified_article(&mut self, article_id: String) -> Result<String> {
        self.send(&Request::RemoveSpecifiedArticle { article_id })?;
        self.read_result()
    }

    // serializes one value onto the connection, flushing so the server sees it
    // immediately
    fn send<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, value)
            .map_err(|e| WeblogError::Protocol(format!("could not encode request: {}", e)))?;
        self.writer.flush().map_err(WeblogError::Connection)?;
        Ok(())
    }

    fn read_response(&mut self) -> Result<Response> {
        Response::deserialize(&mut self.reader)
            .map_err(|e| WeblogError::Protocol(format!("could not decode response: {}", e)))
    }

    // reads the next response, expecting the single-string result variant
    fn read_result(&mut self) -> Result<String> {
        match self.read_response()? {
            Response::Result { result } => Ok(result),
            Response::Err(msg) => Err(WeblogError::Protocol(msg)), // re-throwing error here
            resp => Err(WeblogError::Protocol(format!(
                "unexpected response: {:?}",
                resp
            ))),
        }
    }
}
