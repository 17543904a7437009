use std::time::Duration;

use weekly_report::config::FetchSettings;
use weekly_report::extractor::FetchStatus;
use weekly_report::fetcher::{ArticleClient, ArticleSource, FetchError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const ARTICLE: &str = r#"<html><head><meta charset="utf-8"></head><body>
<h1 id="activity-name">本周医药要闻</h1>
<div id="js_content"><p>某创新药获批上市。</p><script>var x = 1;</script><p>多家药企发布年报。</p></div>
</body></html>"#;

const CHALLENGE: &str = r#"<html><body><p>当前环境异常，完成验证后即可继续访问。</p><p>为了你的账号安全</p></body></html>"#;

fn client() -> ArticleClient {
    ArticleClient::new(&FetchSettings::default().without_delay()).unwrap()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(body.as_bytes())
        .insert_header("Content-Type", "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_fetch_article_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s/abc"))
        .respond_with(html(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/s/abc", mock_server.uri());
    let record = client().fetch_article(&url).await;

    assert_eq!(record.status, FetchStatus::Ok);
    assert_eq!(record.source_url, url);
    assert_eq!(record.title, "本周医药要闻");
    assert_eq!(record.body_text, "某创新药获批上市。\n多家药企发布年报。");
}

fn sent_header(request: &wiremock::Request, name: &str) -> String {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_browser_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("Referer", "https://mp.weixin.qq.com/"))
        .respond_with(html(ARTICLE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/ua", mock_server.uri());
    let record = client().fetch_article(&url).await;
    assert_eq!(record.status, FetchStatus::Ok);

    let requests = mock_server.received_requests().await.unwrap();
    let user_agent = sent_header(&requests[0], "user-agent");
    assert!(user_agent.starts_with("Mozilla/5.0"));
    assert!(user_agent.contains("Chrome/"));
    assert_eq!(
        sent_header(&requests[0], "accept-language"),
        "zh-CN,zh;q=0.9,en;q=0.8"
    );
    assert!(sent_header(&requests[0], "accept").starts_with("text/html"));
}

#[tokio::test]
async fn test_challenge_page_is_blocked_regardless_of_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html(CHALLENGE))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_bytes(CHALLENGE.as_bytes())
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    for route in ["/ok", "/forbidden"] {
        let url = format!("{}{}", mock_server.uri(), route);
        let record = client().fetch_article(&url).await;
        assert_eq!(record.status, FetchStatus::Blocked, "{route}");
    }
}

#[tokio::test]
async fn test_page_without_markup_is_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(html("<html><body><p>Hello World</p></body></html>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/plain", mock_server.uri());
    let record = client().fetch_article(&url).await;

    assert_eq!(record.status, FetchStatus::NoContent);
    assert_eq!(record.title, "无标题");
}

#[tokio::test]
async fn test_body_is_truncated_to_cap() {
    let mock_server = MockServer::start().await;
    let long = format!(
        r#"<h1 id="activity-name">长文</h1><div id="js_content"><p>{}</p></div>"#,
        "药".repeat(10_000)
    );

    Mock::given(method("GET"))
        .and(path("/long"))
        .respond_with(html(&long))
        .mount(&mock_server)
        .await;

    let settings = FetchSettings {
        max_body_chars: 3000,
        ..FetchSettings::default().without_delay()
    };
    let client = ArticleClient::new(&settings).unwrap();
    let record = client
        .fetch_article(&format!("{}/long", mock_server.uri()))
        .await;

    assert_eq!(record.status, FetchStatus::Ok);
    assert_eq!(record.body_text.chars().count(), 3000);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html(ARTICLE).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let settings = FetchSettings {
        timeout: Duration::from_millis(200),
        ..FetchSettings::default().without_delay()
    };
    let client = ArticleClient::new(&settings).unwrap();
    let url = format!("{}/slow", mock_server.uri());

    let err = client.fetch_page(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::RequestTimeout));

    let record = client.fetch_article(&url).await;
    assert_eq!(record.status, FetchStatus::NetworkError);
    assert!(record.body_text.contains("timeout"));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on the discard port.
    let record = client().fetch_article("http://127.0.0.1:9/s/none").await;
    assert_eq!(record.status, FetchStatus::NetworkError);
    assert!(!record.body_text.is_empty());
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/short"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html(ARTICLE))
        .mount(&mock_server)
        .await;

    let page = client()
        .fetch_page(&format!("{}/short", mock_server.uri()))
        .await
        .unwrap();

    assert!(page.status.is_success());
    assert!(page.url_final.as_str().ends_with("/final"));
    assert!(page.body_utf8.contains("本周医药要闻"));
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(ARTICLE.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let record = client()
        .fetch_article(&format!("{}/gzipped", mock_server.uri()))
        .await;

    assert_eq!(record.status, FetchStatus::Ok);
    assert_eq!(record.title, "本周医药要闻");
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    // Create a large body (6MB > 5MB limit)
    let large_body = "x".repeat(6 * 1024 * 1024);

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(large_body.as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let result = client()
        .fetch_page(&format!("{}/large", mock_server.uri()))
        .await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => assert_eq!(size, 6 * 1024 * 1024),
        other => panic!("Expected BodyTooLarge error, got {:?}", other.map(|p| p.status)),
    }
}

#[tokio::test]
async fn test_fetch_invalid_url() {
    let result = client().fetch_page("not-a-valid-url").await;
    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));

    let result = client().fetch_page("ftp://example.com/file").await;
    assert!(matches!(result, Err(FetchError::UnsupportedScheme(s)) if s == "ftp"));
}
