use std::fs;

use crate::config::FetchSettings;
use crate::extractor::{Extractor, FetchStatus, UNTITLED};

fn wechat_extractor(max_body_chars: usize) -> Extractor {
    let settings = FetchSettings {
        max_body_chars,
        ..FetchSettings::default()
    };
    Extractor::from_settings(&settings).expect("default selectors compile")
}

#[test]
fn test_extract_article() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let record = wechat_extractor(3000).extract("https://mp.weixin.qq.com/s/abc", &html);

    assert_eq!(record.status, FetchStatus::Ok);
    assert_eq!(record.source_url, "https://mp.weixin.qq.com/s/abc");
    assert_eq!(record.title, "创新药出海加速：本周三笔授权交易");
    assert!(record.body_text.starts_with("本周国内药企共达成三笔海外授权交易"));
    assert!(record.body_text.contains("出海"));
    assert!(!record.body_text.contains("window.__report"));
    assert!(!record.body_text.contains("footer"));
    assert!(!record.body_text.contains("医药观察"));
}

#[test]
fn test_extract_truncates_body() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let record = wechat_extractor(10).extract("https://mp.weixin.qq.com/s/abc", &html);

    assert_eq!(record.status, FetchStatus::Ok);
    assert_eq!(record.body_text.chars().count(), 10);
    assert_eq!(record.body_text, "本周国内药企共达成三");
}

#[test]
fn test_challenge_page_is_blocked() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/blocked.html")
        .expect("Failed to read test fixture");

    let record = wechat_extractor(3000).extract("https://mp.weixin.qq.com/s/xyz", &html);

    assert_eq!(record.status, FetchStatus::Blocked);
    assert!(record.body_text.is_empty());
}

#[test]
fn test_deleted_article_has_no_content() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/deleted.html")
        .expect("Failed to read test fixture");

    let record = wechat_extractor(3000).extract("https://mp.weixin.qq.com/s/gone", &html);

    assert_eq!(record.status, FetchStatus::NoContent);
    assert_eq!(record.title, UNTITLED);
    assert!(record.render().contains("未抓取到正文"));
}

#[test]
fn test_title_without_body() {
    let html = r#"<h1 id="activity-name">只有标题</h1>"#;
    let record = wechat_extractor(3000).extract("https://e.com/a", html);

    assert_eq!(record.status, FetchStatus::NoContent);
    assert_eq!(record.title, "只有标题");
}

#[test]
fn test_malformed_html() {
    let html = r#"<html><h1 id="activity-name">Broken<div id="js_content"><p>Unclosed tags<div>More content"#;
    let record = wechat_extractor(3000).extract("https://e.com/broken", html);

    // Should handle malformed HTML gracefully
    assert_ne!(record.status, FetchStatus::NetworkError);
    assert!(record.body_text.chars().count() <= 3000);
}

#[test]
fn test_failure_record_is_bounded() {
    let extractor = wechat_extractor(5);
    let record = extractor.failure("https://e.com/a", "connection refused");

    assert_eq!(record.status, FetchStatus::NetworkError);
    assert_eq!(record.body_text, "conne");
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_body_never_exceeds_cap(
            body in ".*",
            cap in 0usize..64,
        ) {
            let html = format!(r#"<div id="js_content"><p>{}</p></div>"#, body);
            let record = wechat_extractor(cap).extract("https://example.com", &html);
            prop_assert!(record.body_text.chars().count() <= cap);
        }

        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = wechat_extractor(3000).extract("https://example.com", &html);
        }

        #[test]
        fn test_extracted_links_are_unique(input in "(https://[a-c]\\.com/[a-c] ?,?\n?){0,12}") {
            let links = crate::links::extract_links(&input);
            let unique: std::collections::HashSet<_> = links.iter().collect();
            prop_assert_eq!(unique.len(), links.len());
        }
    }
}
