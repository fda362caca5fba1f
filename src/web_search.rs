//! Web search used by the `google` commands.
//!
//! The default backend scrapes the DuckDuckGo Lite HTML endpoint, which needs
//! no API key. Results are returned raw; nothing here summarizes them.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// A single search result with title, URL, and snippet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {}", self.title, self.url)?;
        if !self.snippet.is_empty() {
            write!(f, "\n  {}", self.snippet)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("web search: failed to build client: {0}")]
    Client(String),

    #[error("web search: request failed: {0}")]
    Request(String),

    #[error("web search: failed to read response: {0}")]
    Response(String),
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// DuckDuckGo Lite scraper.
pub struct DuckDuckGo {
    endpoint: String,
    timeout: Duration,
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self {
            endpoint: "https://lite.duckduckgo.com/lite/".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[async_trait]
impl WebSearch for DuckDuckGo {
    /// Sends a GET request to the lite endpoint and parses result links,
    /// titles, and snippets from the table-based HTML layout.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0")
            .timeout(self.timeout)
            .build()
            .map_err(|e| SearchError::Client(e.to_string()))?;

        tracing::debug!(query, count, "DuckDuckGo search");
        let resp = client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let html = resp
            .text()
            .await
            .map_err(|e| SearchError::Response(e.to_string()))?;

        Ok(parse_ddg_lite_html(&html, count))
    }
}

/// Parse DuckDuckGo Lite HTML to extract search results.
///
/// The DDG lite page uses a table layout where result rows contain:
/// - A link (`<a>`) with the result URL and title text
/// - A subsequent row with the snippet text in a `<td>` with class `result-snippet`
fn parse_ddg_lite_html(html: &str, count: usize) -> Vec<SearchResult> {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);

    let (Ok(link_selector), Ok(snippet_selector)) = (
        Selector::parse("a.result-link"),
        Selector::parse("td.result-snippet"),
    ) else {
        return Vec::new();
    };

    let snippets: Vec<_> = document.select(&snippet_selector).collect();

    document
        .select(&link_selector)
        .enumerate()
        .filter_map(|(i, link)| {
            let title = link.text().collect::<String>().trim().to_string();
            let url = link.value().attr("href").unwrap_or("").trim().to_string();
            if title.is_empty() || url.is_empty() {
                return None;
            }
            let snippet = snippets
                .get(i)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            Some(SearchResult {
                title,
                url,
                snippet,
            })
        })
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ddg_empty_html() {
        let results = parse_ddg_lite_html("<html><body></body></html>", 10);
        assert!(results.is_empty());
    }

    #[test]
    fn parse_ddg_with_results() {
        let html = r#"
        <html><body>
        <table>
            <tr><td><a class="result-link" href="https://nvd.nist.gov/vuln">OpenSSH CVE</a></td></tr>
            <tr><td class="result-snippet">Remote code execution in sshd</td></tr>
            <tr><td><a class="result-link" href="https://exploit-db.com">Exploit DB</a></td></tr>
            <tr><td class="result-snippet">Archive of exploits</td></tr>
        </table>
        </body></html>
        "#;

        let results = parse_ddg_lite_html(html, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "OpenSSH CVE");
        assert_eq!(results[0].url, "https://nvd.nist.gov/vuln");
        assert_eq!(results[0].snippet, "Remote code execution in sshd");
        assert_eq!(results[1].url, "https://exploit-db.com");
    }

    #[test]
    fn parse_ddg_respects_count_limit() {
        let html = r#"
        <table>
            <tr><td><a class="result-link" href="https://a.com">A</a></td></tr>
            <tr><td class="result-snippet">Snippet A</td></tr>
            <tr><td><a class="result-link" href="https://b.com">B</a></td></tr>
            <tr><td class="result-snippet">Snippet B</td></tr>
            <tr><td><a class="result-link" href="https://c.com">C</a></td></tr>
        </table>
        "#;

        let results = parse_ddg_lite_html(html, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].title, "B");
    }

    #[test]
    fn display_omits_empty_snippet() {
        let result = SearchResult {
            title: "Title".to_string(),
            url: "https://example.com".to_string(),
            snippet: String::new(),
        };
        assert_eq!(result.to_string(), "Title\n  https://example.com");
    }
}
