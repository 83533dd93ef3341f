use std::collections::HashSet;
use std::fs;

use crossbeam_utils::thread;
use tempfile::TempDir;
use weblog::{
    AccessLog, Article, ArticleService, ArticleStore, ErrorLog, JsonArticleStore, WeblogError,
};

const PEER: &str = "127.0.0.1:9999";

fn fixture(dir: &TempDir) -> (ArticleService<JsonArticleStore>, JsonArticleStore) {
    let store = JsonArticleStore::open(dir.path().join("saveArticles.json")).unwrap();
    let access_log = AccessLog::open(&dir.path().join("access.log")).unwrap();
    let error_log = ErrorLog::open(&dir.path().join("error.log")).unwrap();
    let service = ArticleService::new(store.clone(), access_log, error_log);
    (service, store)
}

fn article(id: &str, title: &str, content: &str) -> Article {
    Article {
        article_id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
    }
}

fn ok_blocks(blocks: &[&str]) -> Vec<weblog::Result<String>> {
    blocks.iter().map(|b| Ok(b.to_string())).collect()
}

#[test]
fn ingest_appends_articles_in_order_with_fresh_ids() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store.save(&vec![article("pre", "existing", "kept")]).unwrap();

    let result = service
        .save_all_articles(
            PEER,
            ok_blocks(&["first\nbody one", "second\nbody two", "third\nbody three"]),
        )
        .unwrap();
    assert_eq!(result, "articles saved");

    let articles = store.load().unwrap();
    assert_eq!(articles.len(), 4);
    assert_eq!(articles[0].article_id, "pre");
    assert_eq!(articles[0].content, "kept");
    assert_eq!(articles[1].title, "first");
    assert_eq!(articles[2].title, "second");
    assert_eq!(articles[3].title, "third");
    assert_eq!(articles[3].content, "body three");

    // every ingested article got a distinct, non-empty id
    let ids: HashSet<&str> = articles.iter().map(|a| a.article_id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    assert!(articles.iter().all(|a| !a.article_id.is_empty()));
}

#[test]
fn ingest_of_zero_blocks_reports_empty_and_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);

    let result = service.save_all_articles(PEER, Vec::new()).unwrap();
    assert_eq!(result, "empty file, nothing saved");
    // the store file was never created
    assert!(!store.path().exists());
}

#[test]
fn ingest_of_only_empty_blocks_leaves_the_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store.save(&vec![article("a1", "T", "C")]).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    let result = service.save_all_articles(PEER, ok_blocks(&["", ""])).unwrap();
    assert_eq!(result, "empty file, nothing saved");
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn ingest_stream_error_aborts_without_saving() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);

    let blocks = vec![
        Ok("kept title\nkept content".to_string()),
        Err(WeblogError::Protocol("stream went away".to_string())),
    ];
    let err = service.save_all_articles(PEER, blocks).unwrap_err();
    assert!(matches!(err, WeblogError::Protocol(_)));
    assert!(!store.path().exists());

    let errors = fs::read_to_string(dir.path().join("error.log")).unwrap();
    assert!(errors.contains("FATAL"));
    assert!(errors.contains("error while reading the client stream"));
}

#[test]
fn one_line_block_is_ingested_with_empty_content() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);

    service
        .save_all_articles(PEER, ok_blocks(&["bare title"]))
        .unwrap();

    let articles = store.load().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "bare title");
    assert_eq!(articles[0].content, "");
}

#[test]
fn update_then_get_returns_the_new_values() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store
        .save(&vec![article("a1", "old title", "old content")])
        .unwrap();

    let result = service
        .update_specified_article(
            PEER,
            "a1".to_string(),
            "new title".to_string(),
            "new content".to_string(),
        )
        .unwrap();
    assert_eq!(result, "article a1 updated");

    let got = service.get_specified_article(PEER, "a1".to_string()).unwrap();
    assert_eq!(got.article_id, "a1");
    assert_eq!(got.title, "new title");
    assert_eq!(got.content, "new content");
}

#[test]
fn get_of_a_missing_id_returns_the_sentinels() {
    let dir = TempDir::new().unwrap();
    let (service, _store) = fixture(&dir);

    let got = service
        .get_specified_article(PEER, "nope".to_string())
        .unwrap();
    assert_eq!(got.article_id, "nope");
    assert_eq!(got.title, "title not found");
    assert_eq!(got.content, "content not found");
}

#[test]
fn remove_then_get_returns_the_sentinels() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store.save(&vec![article("a1", "gone", "soon")]).unwrap();

    let result = service
        .remove_specified_article(PEER, "a1".to_string())
        .unwrap();
    assert_eq!(result, "article a1 removed");

    let got = service.get_specified_article(PEER, "a1".to_string()).unwrap();
    assert_eq!(got.article_id, "a1");
    assert_eq!(got.title, "title not found");
    assert_eq!(got.content, "content not found");
}

#[test]
fn update_of_a_missing_id_reports_not_found_and_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);

    let result = service
        .update_specified_article(PEER, "x".to_string(), "t".to_string(), "c".to_string())
        .unwrap();
    assert_eq!(result, "article x not found");
    // the load created the file; the failed update must not have written to it
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
}

#[test]
fn remove_of_a_missing_id_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store.save(&vec![article("a1", "stays", "")]).unwrap();

    let result = service
        .remove_specified_article(PEER, "ghost".to_string())
        .unwrap();
    assert_eq!(result, "article ghost not found");
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn removing_the_only_article_leaves_an_empty_collection() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store.save(&vec![article("a1", "last one", "")]).unwrap();

    service
        .remove_specified_article(PEER, "a1".to_string())
        .unwrap();

    assert!(store.load().unwrap().is_empty());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
}

#[test]
fn remove_preserves_the_relative_order_of_the_rest() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store
        .save(&vec![
            article("a1", "one", ""),
            article("a2", "two", ""),
            article("a3", "three", ""),
        ])
        .unwrap();

    service
        .remove_specified_article(PEER, "a2".to_string())
        .unwrap();

    let articles = store.load().unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].article_id, "a1");
    assert_eq!(articles[1].article_id, "a3");
}

#[test]
fn list_on_an_empty_store_reports_no_articles() {
    let dir = TempDir::new().unwrap();
    let (service, _store) = fixture(&dir);

    assert_eq!(service.get_all_articles(PEER).unwrap(), "no articles available");
}

#[test]
fn list_names_ids_and_titles_in_insertion_order() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);
    store
        .save(&vec![article("a1", "first", ""), article("a2", "second", "")])
        .unwrap();

    let listing = service.get_all_articles(PEER).unwrap();
    assert_eq!(
        listing,
        "\narticleID: a1\ntitle: first\n\narticleID: a2\ntitle: second\n"
    );
}

#[test]
fn concurrent_ingests_do_not_lose_articles() {
    let dir = TempDir::new().unwrap();
    let (service, store) = fixture(&dir);

    thread::scope(|s| {
        for worker in 0..4 {
            let service = service.clone();
            s.spawn(move |_| {
                for i in 0..5 {
                    let block = format!("title {}-{}\ncontent", worker, i);
                    service.save_all_articles(PEER, vec![Ok(block)]).unwrap();
                }
            });
        }
    })
    .unwrap();

    assert_eq!(store.load().unwrap().len(), 20);
}

#[test]
fn handlers_write_access_and_error_log_lines() {
    let dir = TempDir::new().unwrap();
    let (service, _store) = fixture(&dir);

    service
        .get_specified_article(PEER, "ghost".to_string())
        .unwrap();

    let access = fs::read_to_string(dir.path().join("access.log")).unwrap();
    assert!(access.contains(PEER));
    assert!(access.contains("GetSpecifiedArticle"));
    assert!(access.contains("articleID=ghost"));

    let errors = fs::read_to_string(dir.path().join("error.log")).unwrap();
    assert!(errors.contains(" ERROR "));
    assert!(errors.contains("article ghost not found"));
}
