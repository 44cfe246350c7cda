use mockito::{Matcher, Server};

use super::SearchClient;
use crate::backends::traits::SearchProvider;

const RESULT_PAGE: &str = r#"<html><body>
<a href="/" class="nav">返回首页</a>
<a href="https://example.com/follow">关注我们 /news</a>
<a href="/search?page=2">下一页</a>
<a href="/%E5%8A%A8%E6%BC%AB/Perfect%20World">/动漫/<em>Perfect</em> World</a>
<a href=/Movies/Perfect.World.2021>/Movies/Perfect.World.2021</a>
</body></html>"#;

#[tokio::test]
async fn search_scrapes_result_paths_from_anchors() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("box".into(), "perfect".into()),
            Matcher::UrlEncoded("url".into(), "".into()),
            Matcher::UrlEncoded("type".into(), "video".into()),
        ]))
        .with_status(200)
        .with_body(RESULT_PAGE)
        .create_async()
        .await;

    let client = SearchClient::new(&format!("{}/dav", server.url())).unwrap();
    let results = client.search("perfect").await;
    mock.assert_async().await;

    // Navigation chrome and non-path anchors are dropped; nested markup is
    // stripped and percent-encoding decoded.
    assert_eq!(
        results,
        vec![
            "/动漫/Perfect World".to_string(),
            "/Movies/Perfect.World.2021".to_string(),
        ]
    );
}

#[tokio::test]
async fn server_error_yields_no_results() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = SearchClient::new(&format!("{}/dav", server.url())).unwrap();
    assert!(client.search("anything").await.is_empty());
}

#[tokio::test]
async fn unreachable_indexer_yields_no_results() {
    let client = SearchClient::new("http://127.0.0.1:9/dav").unwrap();
    assert!(client.search("anything").await.is_empty());
}

#[test]
fn indexer_origin_drops_the_dav_mount() {
    let client = SearchClient::new("http://host:5678/dav").unwrap();
    assert_eq!(client.origin.as_str(), "http://host:5678/");
}

#[test]
fn malformed_webdav_url_fails_at_construction() {
    assert!(SearchClient::new("not a url").is_err());
}
