use std::io::{BufReader, BufWriter, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::process;

use serde::Deserialize;
use serde_json::Deserializer;
use tracing::{debug, error};

use crate::error::{Result, WeblogError};
use crate::protocol::{Request, Response, StreamFrame};
use crate::service::ArticleService;
use crate::store::ArticleStore;
use crate::thread_pool::ThreadPool;

/// A TCP socket server exposing the five article operations.
/// It listens for incoming connections on a
/// [`SocketAddr`](https://doc.rust-lang.org/std/net/enum.SocketAddr.html) and serves
/// each connection on a thread from its [`ThreadPool`].
///
/// Each thread receives a clone of the [`ArticleService`] and processes the
/// [`Request`]s arriving on its connection one at a time.
///
/// # Example
/// Create a server with 4 worker threads, backed by a json file store
/// ```rust
/// use std::path::Path;
/// use weblog::{AccessLog, ArticleService, ErrorLog, JsonArticleStore, WeblogServer};
/// use weblog::thread_pool::{SharedQueueThreadPool, ThreadPool};
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let store = JsonArticleStore::open("conf/saveArticles.json")?;
/// let access_log = AccessLog::open(Path::new("logger/access.log"))?;
/// let error_log = ErrorLog::open(Path::new("logger/error.log"))?;
/// let service = ArticleService::new(store, access_log, error_log);
/// let pool = SharedQueueThreadPool::new(4)?;
/// let server = WeblogServer::new(service, pool);
/// // start the server
/// //server.run("0.0.0.0:50051")?;
/// #
/// # Ok(())
/// # }
/// ```
///
/// [`Request`]: ./enum.Request.html
/// [`ArticleService`]: ./struct.ArticleService.html
/// [`ThreadPool`]: ./thread_pool/trait.ThreadPool.html
///
pub struct WeblogServer<S: ArticleStore, P: ThreadPool> {
    /// the article service that executes the operations
    service: ArticleService<S>,
    /// a pool of threads that will serve connections using a handle to the service
    pool: P,
}

impl<S: ArticleStore, P: ThreadPool> WeblogServer<S, P> {
    /// Create a new `WeblogServer` from an [`ArticleService`] and a [`ThreadPool`]
    /// implementation.
    ///
    /// [`ArticleService`]: ./struct.ArticleService.html
    /// [`ThreadPool`]: ./thread_pool/trait.ThreadPool.html
    pub fn new(service: ArticleService<S>, pool: P) -> Self {
        WeblogServer { service, pool }
    }

    /// starts the server listening on the given address.
    /// Each connection that comes in gets serviced on its own thread from the
    /// ThreadPool.
    ///
    /// A fatal error inside a worker (the article file can no longer be read or
    /// written) terminates the process with exit code 1. Any other per-connection
    /// error is logged and the server keeps serving.
    ///
    /// # Errors
    /// returns [`WeblogError::Connection`] if the listener could not be bound
    ///
    /// [`WeblogError::Connection`]: ./enum.WeblogError.html#variant.Connection
    pub fn run<A: ToSocketAddrs>(self, addr: A) -> Result<()> {
        let listener = TcpListener::bind(addr).map_err(WeblogError::Connection)?;
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let service = self.service.clone();
                    self.pool.spawn(move || {
                        if let Err(e) = serve(service, stream) {
                            if e.is_fatal() {
                                error!("Fatal error while serving client: {}", e);
                                process::exit(1);
                            }
                            error!("Error on serving client: {}", e);
                        }
                    });
                }
                Err(e) => error!("Connection failed: {}", e),
            }
        }
        Ok(())
    }
}

/// Listens for and processes the [`Request`]s coming over the given `tcp` stream.
/// Each request is deserialized, executed on the [`ArticleService`], and answered
/// with one [`Response`] on the same stream. A bulk ingest request switches the
/// connection to reading [`StreamFrame`]s until the end-of-input marker arrives.
///
/// [`Request`]: ./enum.Request.html
/// [`Response`]: ./enum.Response.html
/// [`StreamFrame`]: ./enum.StreamFrame.html
/// [`ArticleService`]: ./struct.ArticleService.html
///
fn serve<S: ArticleStore>(service: ArticleService<S>, tcp: TcpStream) -> Result<()> {
    // the peer address is a best-effort log label, not a requirement
    let peer = tcp
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| String::from("-"));
    let stream_reader = BufReader::new(&tcp);
    let mut stream_writer = BufWriter::new(&tcp);
    let mut req_reader = Deserializer::from_reader(stream_reader);

    let mut send_resp = |resp: Response| -> Result<()> {
        serde_json::to_writer(&mut stream_writer, &resp)
            .map_err(|e| WeblogError::Protocol(format!("could not encode response: {}", e)))?;
        stream_writer.flush().map_err(WeblogError::Connection)?;
        debug!("Response sent to {}: {:?}", peer, resp);
        Ok(())
    };

    loop {
        let req = match Request::deserialize(&mut req_reader) {
            Ok(req) => req,
            // the client closed the connection between requests
            Err(e) if e.is_eof() => return Ok(()),
            Err(e) => {
                // malformed request: answer best-effort, then drop the connection
                let _ = send_resp(Response::Err(format!("invalid request: {}", e)));
                return Err(WeblogError::Protocol(format!(
                    "invalid request from {}: {}",
                    peer, e
                )));
            }
        };
        debug!("Receive request from {}: {:?}", peer, req);

        match req {
            Request::SaveAllArticles => {
                let mut ended = false;
                let blocks = std::iter::from_fn(|| {
                    if ended {
                        return None;
                    }
                    match StreamFrame::deserialize(&mut req_reader) {
                        Ok(StreamFrame::Block { article }) => Some(Ok(article)),
                        Ok(StreamFrame::End) => {
                            ended = true;
                            None
                        }
                        Err(e) => {
                            ended = true;
                            Some(Err(WeblogError::Protocol(format!(
                                "error while reading the client stream: {}",
                                e
                            ))))
                        }
                    }
                });
                let result = service.save_all_articles(&peer, blocks)?;
                send_resp(Response::Result { result })?;
            }
            Request::GetAllArticles => {
                let result = service.get_all_articles(&peer)?;
                send_resp(Response::Result { result })?;
            }
            Request::GetSpecifiedArticle { article_id } => {
                let article = service.get_specified_article(&peer, article_id)?;
                send_resp(Response::Article {
                    article_id: article.article_id,
                    title: article.title,
                    content: article.content,
                })?;
            }
            Request::UpdateSpecifiedArticle {
                article_id,
                title,
                content,
            } => {
                let result = service.update_specified_article(&peer, article_id, title, content)?;
                send_resp(Response::Result { result })?;
            }
            Request::RemoveSpecifiedArticle { article_id } => {
                let result = service.remove_specified_article(&peer, article_id)?;
                send_resp(Response::Result { result })?;
            }
        };
    }
}
