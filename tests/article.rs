use std::collections::HashSet;

use weblog::{blocks_from_text, id, Article};

#[test]
fn block_with_title_and_content_splits_on_first_newline() {
    let article = Article::from_block("a1".to_string(), "my title\nline one\nline two");
    assert_eq!(article.article_id, "a1");
    assert_eq!(article.title, "my title");
    assert_eq!(article.content, "line one\nline two");
}

#[test]
fn one_line_block_becomes_title_with_empty_content() {
    let article = Article::from_block("a1".to_string(), "only a title");
    assert_eq!(article.title, "only a title");
    assert_eq!(article.content, "");
}

#[test]
fn blocks_are_separated_by_blank_lines() {
    let text = "first title\nfirst content\n\nsecond title\nsecond content\n";
    let blocks = blocks_from_text(text);
    assert_eq!(
        blocks,
        vec!["first title\nfirst content", "second title\nsecond content"]
    );
}

#[test]
fn runs_of_blank_lines_produce_no_empty_blocks() {
    let text = "\n\nalpha\n\n\n\nbeta\nbody\n\n\n";
    let blocks = blocks_from_text(text);
    assert_eq!(blocks, vec!["alpha", "beta\nbody"]);
}

#[test]
fn crlf_line_endings_are_tolerated() {
    let text = "title\r\ncontent line\r\n\r\nnext title\r\nmore\r\n";
    let blocks = blocks_from_text(text);
    assert_eq!(blocks, vec!["title\ncontent line", "next title\nmore"]);
}

#[test]
fn empty_text_produces_no_blocks() {
    assert!(blocks_from_text("").is_empty());
    assert!(blocks_from_text("\n\n\n").is_empty());
}

#[test]
fn generated_ids_use_dash_grouped_hex() {
    let id = id::generate();
    assert_eq!(id.len(), 36);
    let dash_positions: Vec<usize> = id
        .char_indices()
        .filter(|(_, c)| *c == '-')
        .map(|(i, _)| i)
        .collect();
    assert_eq!(dash_positions, vec![8, 13, 18, 23]);
    assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
}

#[test]
fn generated_ids_are_distinct() {
    let ids: HashSet<String> = (0..100).map(|_| id::generate()).collect();
    assert_eq!(ids.len(), 100);
}
