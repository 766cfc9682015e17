//! Tool descriptors and handlers exposed over the session.
//!
//! Tool-execution failures are reported inside the result payload as text
//! content, never as protocol errors; the session channel stays stable even
//! when every registry is down.

use serde_json::{json, Value};

use crate::models::PaperRecord;
use crate::sources::PaperAssembler;

/// Name of the keyword search tool.
pub const SEARCH_PAPERS: &str = "search_papers";

/// Name of the per-DOI abstract tool.
pub const GET_ABSTRACT_BY_DOI: &str = "get_abstract_by_doi";

const DEFAULT_SEARCH_COUNT: usize = 10;
const ENTRY_SEPARATOR_LEN: usize = 50;

/// Descriptors advertised via `tools/list`.
pub fn descriptors() -> Value {
    json!([
        {
            "name": SEARCH_PAPERS,
            "description": "키워드로 논문을 검색하고 초록을 가져옵니다.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "검색할 키워드"
                    },
                    "count": {
                        "type": "integer",
                        "description": "검색할 논문 수 (기본값: 10, 최대: 50)",
                        "default": 10
                    }
                },
                "required": ["query"]
            }
        },
        {
            "name": GET_ABSTRACT_BY_DOI,
            "description": "DOI로 특정 논문의 초록을 가져옵니다.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "doi": {
                        "type": "string",
                        "description": "논문의 DOI"
                    }
                },
                "required": ["doi"]
            }
        }
    ])
}

/// Runs the named tool and renders its content blocks.
pub async fn call(assembler: &PaperAssembler, name: &str, arguments: &Value) -> Value {
    let text = match name {
        SEARCH_PAPERS => search_papers(assembler, arguments).await,
        GET_ABSTRACT_BY_DOI => get_abstract_by_doi(assembler, arguments).await,
        unknown => format!("알 수 없는 도구: {}", unknown),
    };

    json!([{ "type": "text", "text": text }])
}

async fn search_papers(assembler: &PaperAssembler, arguments: &Value) -> String {
    let query = arguments.get("query").and_then(Value::as_str).unwrap_or("");
    if query.is_empty() {
        return "검색할 키워드를 입력해주세요.".to_string();
    }

    let count = arguments
        .get("count")
        .and_then(Value::as_u64)
        .map(|count| count as usize)
        .unwrap_or(DEFAULT_SEARCH_COUNT);

    let papers = assembler.search_with_abstracts(query, count).await;
    if papers.is_empty() {
        return format!("'{}' 키워드로 검색된 논문이 없습니다.", query);
    }

    render_paper_list(query, &papers)
}

fn render_paper_list(query: &str, papers: &[PaperRecord]) -> String {
    let mut out = format!("'{}' 키워드로 {}개 논문을 찾았습니다:\n\n", query, papers.len());

    for (index, paper) in papers.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", index + 1, paper.title));
        out.push_str(&format!("저자: {}\n", paper.authors));
        out.push_str(&format!("저널: {}\n", paper.publication_name));
        out.push_str(&format!("발행일: {}\n", paper.publication_date));
        out.push_str(&format!("인용: {}\n", paper.cited_by_count));
        out.push_str(&format!("DOI: {}\n", paper.doi));

        if paper.has_abstract() {
            out.push_str(&format!(
                "초록 ({}): {}\n",
                paper.abstract_source, paper.abstract_text
            ));
        } else {
            out.push_str("초록: 없음\n");
        }

        out.push_str(&format!("Scopus URL: {}\n", paper.scopus_url));
        out.push_str(&"-".repeat(ENTRY_SEPARATOR_LEN));
        out.push('\n');
    }

    out
}

async fn get_abstract_by_doi(assembler: &PaperAssembler, arguments: &Value) -> String {
    let doi = arguments.get("doi").and_then(Value::as_str).unwrap_or("");
    if doi.is_empty() {
        return "DOI를 입력해주세요.".to_string();
    }

    let result = assembler.best_abstract(doi).await;

    if result.success {
        format!(
            "DOI: {}\n제목: {}\n초록 소스: {}\n초록: {}\n",
            doi, result.title, result.source, result.abstract_text
        )
    } else {
        format!("DOI '{}'에 대한 초록을 찾을 수 없습니다.", doi)
    }
}
