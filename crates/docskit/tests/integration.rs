//! Integration tests for DocsKit using wiremock

use docskit::fetchers::FETCH_TIMEOUT_MESSAGE;
use docskit::search::Searcher;
use docskit::{
    DefaultFetcher, DocsError, DocsRequest, FetchMode, Fetcher, LibraryRegistry, SerperClient,
    Tool, NO_RESULTS_MESSAGE,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<!DOCTYPE html><html><body>{body}</body></html>"),
        "text/html",
    )
}

async fn mount_search(server: &MockServer, query: &str, links: &[String]) {
    let organic: Vec<_> = links
        .iter()
        .enumerate()
        .map(|(i, link)| json!({"title": format!("Result {i}"), "link": link, "position": i + 1}))
        .collect();

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "test-key"))
        .and(body_json(json!({"q": query, "num": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchParameters": {"q": query},
            "organic": organic,
        })))
        .mount(server)
        .await;
}

fn tool_for(server: &MockServer) -> Tool {
    Tool::builder()
        .api_key("test-key")
        .search_endpoint(format!("{}/search", server.uri()))
        .build()
}

#[tokio::test]
async fn test_chroma_lookup_truncated() {
    let server = MockServer::start().await;
    let links = vec![
        format!("{}/docs/chroma", server.uri()),
        format!("{}/docs/vectorstores", server.uri()),
    ];
    mount_search(&server, "site:python.langchain.com/docs Chroma DB", &links).await;

    Mock::given(method("GET"))
        .and(path("/docs/chroma"))
        .respond_with(html_page(
            "<nav>Menu</nav><main><h1>Chroma</h1><p>Chroma is an AI-native vector database.</p></main>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/vectorstores"))
        .respond_with(html_page("<article><p>Vector stores overview.</p></article>"))
        .mount(&server)
        .await;

    let tool = tool_for(&server);
    let text1 = "Chroma\n\nChroma is an AI-native vector database.";
    let text2 = "Vector stores overview.";

    let full = tool
        .execute(DocsRequest::new("Chroma DB", "langchain"))
        .await
        .unwrap();
    assert_eq!(full, format!("{text1}{text2}"));

    let excerpt = tool
        .execute(DocsRequest::new("Chroma DB", "langchain").max_chars(50))
        .await
        .unwrap();
    let expected: String = format!("{text1}{text2}").chars().take(50).collect();
    assert_eq!(excerpt, expected);
}

#[tokio::test]
async fn test_no_results() {
    let server = MockServer::start().await;
    mount_search(&server, "site:platform.openai.com/docs embeddings", &[]).await;

    let tool = tool_for(&server);
    for max_chars in [0, 1000] {
        let text = tool
            .execute(DocsRequest::new("embeddings", "openai").max_chars(max_chars))
            .await
            .unwrap();
        assert_eq!(text, NO_RESULTS_MESSAGE);
    }
}

#[tokio::test]
async fn test_missing_organic_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"credits": 1})))
        .mount(&server)
        .await;

    let text = tool_for(&server)
        .execute(DocsRequest::new("agents", "llama-index"))
        .await
        .unwrap();
    assert_eq!(text, "No results found.");
}

#[tokio::test]
async fn test_zero_max_chars_with_results() {
    let server = MockServer::start().await;
    let links = vec![format!("{}/docs/page", server.uri())];
    mount_search(&server, "site:platform.openai.com/docs files", &links).await;
    Mock::given(method("GET"))
        .and(path("/docs/page"))
        .respond_with(html_page("<main>Files API</main>"))
        .mount(&server)
        .await;

    let text = tool_for(&server)
        .execute(DocsRequest::new("files", "openai").max_chars(0))
        .await
        .unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_unsupported_library_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = tool_for(&server)
        .execute(DocsRequest::new("Chroma DB", "unknown-lib"))
        .await
        .unwrap_err();
    assert!(matches!(err, DocsError::UnsupportedLibrary { .. }));
    assert!(err
        .to_string()
        .contains("Supported libraries are: langchain, llama-index, openai"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_timeout_degrades_to_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"organic": [{"link": "https://example.com"}]}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let tool = Tool::builder()
        .api_key("test-key")
        .search_endpoint(format!("{}/search", server.uri()))
        .timeout(Duration::from_millis(200))
        .build();

    let text = tool
        .execute(DocsRequest::new("tools", "openai"))
        .await
        .unwrap();
    assert_eq!(text, "No results found.");
}

#[tokio::test]
async fn test_search_status_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = tool_for(&server)
        .execute(DocsRequest::new("tools", "openai"))
        .await;
    assert!(matches!(result, Err(DocsError::SearchStatus { status: 403 })));
}

#[tokio::test]
async fn test_search_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = SerperClient::new("test-key").endpoint(format!("{}/search", server.uri()));
    let result = client.search("site:platform.openai.com/docs x").await;
    assert!(matches!(result, Err(DocsError::SearchDecode(_))));
}

#[tokio::test]
async fn test_search_connection_error() {
    let client = SerperClient::new("test-key").endpoint("http://127.0.0.1:1/search");
    let result = client.search("site:platform.openai.com/docs x").await;
    assert!(matches!(result, Err(DocsError::SearchRequest(_))));
}

#[tokio::test]
async fn test_search_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("user-agent", "docs-app/1.0"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [{"link": "https://a.example"}, {"link": "https://b.example"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SerperClient::new("test-key").endpoint(format!("{}/search", server.uri()));
    let results = client.search("q").await.unwrap();
    let links: Vec<_> = results.iter().map(|r| r.link.as_str()).collect();
    assert_eq!(links, ["https://a.example", "https://b.example"]);
}

#[tokio::test]
async fn test_fetch_timeout_keeps_other_page() {
    let server = MockServer::start().await;
    let links = vec![
        format!("{}/docs/slow", server.uri()),
        format!("{}/docs/fast", server.uri()),
    ];
    mount_search(&server, "site:docs.llamaindex.ai/en/stable agents", &links).await;

    Mock::given(method("GET"))
        .and(path("/docs/slow"))
        .respond_with(html_page("<main>never seen</main>").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/fast"))
        .respond_with(html_page("<main>Agents guide</main>"))
        .mount(&server)
        .await;

    let tool = Tool::builder()
        .api_key("test-key")
        .search_endpoint(format!("{}/search", server.uri()))
        .timeout(Duration::from_millis(500))
        .build();

    let text = tool
        .execute(DocsRequest::new("agents", "llama-index"))
        .await
        .unwrap();
    assert_eq!(text, format!("{FETCH_TIMEOUT_MESSAGE}Agents guide"));
}

#[tokio::test]
async fn test_binary_page_contributes_nothing() {
    let server = MockServer::start().await;
    let links = vec![
        format!("{}/docs/diagram.png", server.uri()),
        format!("{}/docs/page", server.uri()),
    ];
    mount_search(&server, "site:platform.openai.com/docs images", &links).await;

    Mock::given(method("GET"))
        .and(path("/docs/diagram.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/page"))
        .respond_with(html_page("<main>Images guide</main>"))
        .mount(&server)
        .await;

    let text = tool_for(&server)
        .execute(DocsRequest::new("images", "openai"))
        .await
        .unwrap();
    assert_eq!(text, "Images guide");
}

#[tokio::test]
async fn test_sequential_fetch_mode() {
    let server = MockServer::start().await;
    let links = vec![
        format!("{}/docs/one", server.uri()),
        format!("{}/docs/two", server.uri()),
    ];
    mount_search(&server, "site:platform.openai.com/docs batch", &links).await;
    Mock::given(method("GET"))
        .and(path("/docs/one"))
        .respond_with(html_page("<main>one</main>").set_delay(Duration::from_millis(100)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/two"))
        .respond_with(html_page("<main>two</main>"))
        .mount(&server)
        .await;

    let tool = Tool::builder()
        .api_key("test-key")
        .search_endpoint(format!("{}/search", server.uri()))
        .fetch_mode(FetchMode::Sequential)
        .build();

    let text = tool
        .execute(DocsRequest::new("batch", "openai"))
        .await
        .unwrap();
    assert_eq!(text, "onetwo");
}

#[tokio::test]
async fn test_custom_registry() {
    let server = MockServer::start().await;
    mount_search(&server, "site:docs.rs/tokio spawn", &[]).await;

    let registry = LibraryRegistry::from_json(r#"{"tokio": "docs.rs/tokio"}"#).unwrap();
    let tool = Tool::builder()
        .api_key("test-key")
        .search_endpoint(format!("{}/search", server.uri()))
        .registry(registry)
        .build();

    let text = tool
        .execute(DocsRequest::new("spawn", "tokio"))
        .await
        .unwrap();
    assert_eq!(text, "No results found.");

    let err = tool
        .execute(DocsRequest::new("spawn", "openai"))
        .await
        .unwrap_err();
    assert!(err.to_string().ends_with("Supported libraries are: tokio"));
}

#[tokio::test]
async fn test_fetcher_extracts_error_page_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw("<html><body><main>Page not found</main></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let fetcher = DefaultFetcher::new();
    let text = fetcher
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .unwrap();
    assert_eq!(text, "Page not found");
}

#[tokio::test]
async fn test_fetcher_custom_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(html_page("<article>Hello</article>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = DefaultFetcher::new().user_agent("TestAgent/1.0");
    let text = fetcher.fetch_text(&format!("{}/", server.uri())).await;
    assert_eq!(text, "Hello");
}
