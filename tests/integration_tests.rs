//! Integration tests for Abstract Search MCP
//!
//! These tests drive the full protocol session over in-memory streams, with
//! the registry adapters replaced by mocks, and check the exact line-level
//! behavior of the stdio protocol.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use abstract_search_mcp::mcp::McpServer;
use abstract_search_mcp::models::AbstractSource;
use abstract_search_mcp::sources::mock::{make_entry, MockProvider, MockSearch};
use abstract_search_mcp::sources::{AbstractProvider, AbstractSelector, PaperAssembler};

fn server_with(search: MockSearch, providers: Vec<MockProvider>) -> McpServer {
    let providers = providers
        .into_iter()
        .map(|p| Arc::new(p) as Arc<dyn AbstractProvider>)
        .collect();
    McpServer::new(PaperAssembler::new(
        Arc::new(search),
        AbstractSelector::new(providers),
    ))
}

/// Runs the scripted input through a session and returns the parsed output
/// lines.
async fn run_session(server: McpServer, input: &str) -> Vec<serde_json::Value> {
    let mut output = Vec::new();
    server
        .serve(input.as_bytes(), &mut output)
        .await
        .expect("session should not fail");

    String::from_utf8(output)
        .expect("protocol output is UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("one JSON value per line"))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_full_handshake_and_search() {
    let search = MockSearch::with_entries(vec![make_entry(
        "Deep learning for protein folding",
        Some("10.1000/example.1"),
    )]);
    let server = server_with(
        search,
        vec![
            MockProvider::succeeding(AbstractSource::Crossref, 9, "<p>Folding networks.</p>"),
            MockProvider::failing(AbstractSource::Pubmed, 8),
        ],
    );

    let input = concat!(
        "{\"id\":1,\"method\":\"initialize\"}\n",
        "{\"method\":\"notifications/initialized\"}\n",
        "{\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"search_papers\",\"arguments\":{\"query\":\"folding\"}}}\n",
    );
    let responses = run_session(server, input).await;

    // The notification produced no line: two requests, two responses.
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "abstract-search");

    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("'folding' 키워드로 1개 논문을 찾았습니다:"));
    assert!(text.contains("[1] Deep learning for protein folding"));
    assert!(text.contains("초록 (crossref): Folding networks."));
}

#[tokio::test(start_paused = true)]
async fn test_selector_prefers_crossref_deterministically() {
    // Both registries succeed; the higher quality score must win every time.
    for _ in 0..3 {
        let server = server_with(
            MockSearch::new(),
            vec![
                MockProvider::succeeding(AbstractSource::Crossref, 9, "From crossref.")
                    .with_title("Crossref Title"),
                MockProvider::succeeding(AbstractSource::Pubmed, 8, "From pubmed.")
                    .with_title("Pubmed Title"),
            ],
        );

        let input = "{\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"get_abstract_by_doi\",\"arguments\":{\"doi\":\"10.1000/x\"}}}\n";
        let responses = run_session(server, input).await;
        let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();

        assert!(text.contains("초록 소스: crossref"));
        assert!(text.contains("제목: Crossref Title"));
        assert!(text.contains("초록: From crossref."));
    }
}

#[tokio::test(start_paused = true)]
async fn test_selector_falls_back_to_pubmed() {
    let server = server_with(
        MockSearch::new(),
        vec![
            MockProvider::failing(AbstractSource::Crossref, 9),
            MockProvider::succeeding(AbstractSource::Pubmed, 8, "Only pubmed has this."),
        ],
    );

    let input = "{\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"get_abstract_by_doi\",\"arguments\":{\"doi\":\"10.1000/x\"}}}\n";
    let responses = run_session(server, input).await;
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();

    assert!(text.contains("초록 소스: pubmed"));
    assert!(text.contains("초록: Only pubmed has this."));
}

#[tokio::test(start_paused = true)]
async fn test_doi_with_no_successful_provider_reports_not_found() {
    let server = server_with(
        MockSearch::new(),
        vec![
            MockProvider::failing(AbstractSource::Crossref, 9),
            MockProvider::failing(AbstractSource::Pubmed, 8),
        ],
    );

    let input = "{\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"get_abstract_by_doi\",\"arguments\":{\"doi\":\"10.1000/gone\"}}}\n";
    let responses = run_session(server, input).await;

    assert!(responses[0].get("error").is_none());
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "DOI '10.1000/gone'에 대한 초록을 찾을 수 없습니다.");
}

#[tokio::test(start_paused = true)]
async fn test_stub_abstract_is_normalized_end_to_end() {
    let server = server_with(
        MockSearch::new(),
        vec![MockProvider::succeeding(
            AbstractSource::Crossref,
            9,
            "<p>Example abstract.</p>",
        )],
    );

    let input = "{\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"get_abstract_by_doi\",\"arguments\":{\"doi\":\"10.1016/S0014-5793(01)03313-0\"}}}\n";
    let responses = run_session(server, input).await;
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();

    // Tags stripped, trailing period preserved.
    assert!(text.contains("초록: Example abstract."));
}

#[tokio::test(start_paused = true)]
async fn test_zero_count_search_skips_enrichment() {
    let search = MockSearch::new();
    let search_calls = search.call_counter();
    let provider = MockProvider::succeeding(AbstractSource::Crossref, 9, "Never fetched.");
    let provider_calls = provider.call_counter();
    let server = server_with(search, vec![provider]);

    let input = "{\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"search_papers\",\"arguments\":{\"query\":\"quantum\",\"count\":0}}}\n";
    let responses = run_session(server, input).await;

    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "'quantum' 키워드로 검색된 논문이 없습니다.");
    assert_eq!(search_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_entries_without_doi_render_missing_abstract() {
    let search = MockSearch::with_entries(vec![make_entry("Untracked preprint", None)]);
    let server = server_with(
        search,
        vec![MockProvider::succeeding(
            AbstractSource::Crossref,
            9,
            "Never fetched.",
        )],
    );

    let input = "{\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"search_papers\",\"arguments\":{\"query\":\"preprint\"}}}\n";
    let responses = run_session(server, input).await;
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();

    assert!(text.contains("[1] Untracked preprint"));
    assert!(text.contains("초록: 없음"));
    assert!(text.contains("DOI: N/A"));
}

#[tokio::test]
async fn test_malformed_then_valid_line_keeps_session_alive() {
    let server = server_with(MockSearch::new(), Vec::new());

    let input = "{\"id\":1,\"method\":\"initialize\"\n{\"id\":2,\"method\":\"tools/list\"}\n";
    let responses = run_session(server, input).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], serde_json::Value::Null);
    assert_eq!(responses[0]["error"]["code"], -32603);
    assert!(responses[0]["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Internal error"));
    assert_eq!(responses[1]["id"], 2);
    assert!(responses[1].get("result").is_some());
}

#[tokio::test]
async fn test_non_object_json_line_takes_malformed_path() {
    let server = server_with(MockSearch::new(), Vec::new());
    let responses = run_session(server, "42\n").await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], serde_json::Value::Null);
    assert_eq!(responses[0]["error"]["code"], -32603);
}
