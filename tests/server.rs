use std::io::Write;
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Deserializer;
use tempfile::TempDir;
use weblog::thread_pool::{NaiveThreadPool, RayonThreadPool, SharedQueueThreadPool, ThreadPool};
use weblog::{
    AccessLog, ArticleService, ErrorLog, JsonArticleStore, Request, Response, StreamFrame,
    WeblogClient, WeblogServer,
};

// each test binds its own fixed port so they can run in parallel
fn start_server<P: ThreadPool + Send + 'static>(dir: &TempDir, pool: P, addr: &'static str) {
    let store = JsonArticleStore::open(dir.path().join("saveArticles.json")).unwrap();
    let access_log = AccessLog::open(&dir.path().join("access.log")).unwrap();
    let error_log = ErrorLog::open(&dir.path().join("error.log")).unwrap();
    let service = ArticleService::new(store, access_log, error_log);
    let server = WeblogServer::new(service, pool);
    thread::spawn(move || {
        let _ = server.run(addr);
    });
    wait_for_server(addr);
}

fn wait_for_server(addr: &str) {
    for _ in 0..50 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        thread::sleep(Duration::from_millis(20));
    }
    panic!("server at {} did not come up", addr);
}

#[test]
fn round_trips_all_five_operations_over_one_connection() {
    let dir = TempDir::new().unwrap();
    start_server(&dir, SharedQueueThreadPool::new(4).unwrap(), "127.0.0.1:4101");

    let mut client = WeblogClient::connect("127.0.0.1:4101").unwrap();
    let result = client
        .save_all_articles(vec![
            "first title\nfirst content".to_string(),
            "second title\nsecond content".to_string(),
        ])
        .unwrap();
    assert_eq!(result, "articles saved");

    let listing = client.get_all_articles().unwrap();
    assert!(listing.contains("title: first title"));
    assert!(listing.contains("title: second title"));

    // the listing carries the generated ids in storage order, the first one
    // belongs to the first saved article
    let id = listing
        .lines()
        .find_map(|line| line.strip_prefix("articleID: "))
        .expect("listing should contain an articleID line")
        .to_string();

    let article = client.get_specified_article(id.clone()).unwrap();
    assert_eq!(article.article_id, id);
    assert_eq!(article.title, "first title");
    assert_eq!(article.content, "first content");

    let result = client
        .update_specified_article(id.clone(), "new title".to_string(), "new content".to_string())
        .unwrap();
    assert_eq!(result, format!("article {} updated", id));

    let article = client.get_specified_article(id.clone()).unwrap();
    assert_eq!(article.title, "new title");
    assert_eq!(article.content, "new content");

    let result = client.remove_specified_article(id.clone()).unwrap();
    assert_eq!(result, format!("article {} removed", id));

    let listing = client.get_all_articles().unwrap();
    assert!(!listing.contains(&id));
    assert!(listing.contains("title: second title"));
}

#[test]
fn rejects_a_malformed_request_and_keeps_serving() {
    let dir = TempDir::new().unwrap();
    start_server(&dir, NaiveThreadPool::new(1).unwrap(), "127.0.0.1:4102");

    let mut stream = TcpStream::connect("127.0.0.1:4102").unwrap();
    stream.write_all(b"{ this is not a request").unwrap();
    stream.flush().unwrap();

    let mut reader = Deserializer::from_reader(&stream);
    let resp = Response::deserialize(&mut reader).unwrap();
    assert!(matches!(resp, Response::Err(msg) if msg.starts_with("invalid request")));

    // the bad connection is dropped, new connections still get served
    let mut client = WeblogClient::connect("127.0.0.1:4102").unwrap();
    assert_eq!(client.get_all_articles().unwrap(), "no articles available");
}

#[test]
fn abandoned_ingest_saves_nothing() {
    let dir = TempDir::new().unwrap();
    start_server(&dir, RayonThreadPool::new(2).unwrap(), "127.0.0.1:4103");

    {
        let stream = TcpStream::connect("127.0.0.1:4103").unwrap();
        serde_json::to_writer(&stream, &Request::SaveAllArticles).unwrap();
        serde_json::to_writer(
            &stream,
            &StreamFrame::Block {
                article: "orphan title\norphan content".to_string(),
            },
        )
        .unwrap();
        // connection dropped before the end-of-input marker
    }
    thread::sleep(Duration::from_millis(300));

    let mut client = WeblogClient::connect("127.0.0.1:4103").unwrap();
    assert_eq!(client.get_all_articles().unwrap(), "no articles available");
}
