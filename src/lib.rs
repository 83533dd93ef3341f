#![deny(missing_docs)]
//! A multithreaded article management service (weblog), that persists articles to a
//! flat json-encoded file.
//!
//! This crate provides the article store and service themselves, as well as a
//! [`weblog-server`] and [`weblog-client`] executable that can be used to interact
//! with the service. Article data is sent between the client and server using
//! synchronous networking over a custom protocol.
//!
//! ## Supported Operations
//! The service supports five remote operations:
//!
//! - `SaveAllArticles` streams raw article blocks to the server, which assigns each
//!   one a fresh id and appends the whole batch to storage in one save
//! - `GetAllArticles` lists the id and title of every stored article
//! - `GetSpecifiedArticle` fetches one article by id
//! - `UpdateSpecifiedArticle` overwrites the title and content of one article
//! - `RemoveSpecifiedArticle` deletes one article
//!
//! See the [`ArticleService`] struct and the [`Request`] and [`Response`] types for
//! more information on the structure of these operations.
//!
//! ## JsonArticleStore
//! [`JsonArticleStore`] is the implementor of the [`ArticleStore`] trait and the
//! sole owner of persistence. The full article collection lives in a single json
//! file: every operation re-reads and re-decodes that file, and every mutation
//! re-encodes and overwrites it. There is no cache and no index, the file is the
//! single source of truth.
//!
//! ## Client / Server
//! Client and server logic is contained in the [`WeblogClient`] and [`WeblogServer`]
//! structs. They are responsible for the networking portion of this application, but
//! also handle the serialization of requests and responses to/from the custom
//! protocol.
//!
//! ## Custom Protocol
//! The custom protocol is a sequence of json values exchanged over Rust's TcpStream:
//! a [`Request`], followed (only for bulk ingest) by a stream of [`StreamFrame`]s,
//! is answered with exactly one [`Response`]. Business-level outcomes such as
//! not-found are reported inside a successful [`Response`]; the `Err` response is
//! reserved for requests the server could not make sense of.
//!
//! ## Logging
//! Two append-only log files accompany the server: an access log naming every
//! operation and its caller, and an error log for notable and fatal conditions.
//! Both are opened by the [`weblog-server`] executable and injected into the
//! [`ArticleService`]. Ambient diagnostics use the [`tracing`] crate, with the
//! executables installing a subscriber that writes to stderr.
//!
//! [`ArticleService`]: ./struct.ArticleService.html
//! [`ArticleStore`]: ./store/trait.ArticleStore.html
//! [`JsonArticleStore`]: ./struct.JsonArticleStore.html
//! [`WeblogClient`]: ./struct.WeblogClient.html
//! [`WeblogServer`]: ./struct.WeblogServer.html
//! [`Request`]: ./enum.Request.html
//! [`Response`]: ./enum.Response.html
//! [`StreamFrame`]: ./enum.StreamFrame.html
//! [`tracing`]: https://docs.rs/tracing
//! [`weblog-server`]: ./weblog-server.rs
//! [`weblog-client`]: ./weblog-client.rs

pub use article::{blocks_from_text, Article, Articles};
pub use client::WeblogClient;
pub use config::ServerConfig;
pub use error::{Result, WeblogError};
pub use logger::{AccessLog, ErrorLog};
pub use protocol::{Request, Response, StreamFrame};
pub use server::WeblogServer;
pub use service::ArticleService;
pub use store::{find_by_id, ArticleStore, JsonArticleStore};
pub use thread_pool::{NaiveThreadPool, RayonThreadPool, SharedQueueThreadPool, ThreadPool};

mod article;
mod client;
mod config;
mod error;
mod logger;
mod protocol;
mod server;
mod service;
mod store;
pub mod id;
pub mod thread_pool;
