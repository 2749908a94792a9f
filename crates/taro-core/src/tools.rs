//! Knowledge-base tool helpers.
//!
//! These back the `search_docs` and `list_kbs` tools the agent engine
//! exposes to the model. Tool output goes straight back into the model's
//! context, so failures fold into the returned text instead of erroring:
//! a broken knowledge base must not abort the turn.

use tracing::error;

use crate::kb::Retrieval;

/// Spaces consulted when no `space_id` is given.
const FAN_OUT_SPACE_LIMIT: usize = 3;

/// Searches document content.
///
/// With a `space_id`, queries that knowledge base for the top 3 snippets.
/// Without one, fans out over the first three available spaces (top 2
/// each); per-space failures are logged and skipped.
pub async fn search_docs<R: Retrieval>(rag: &R, query: &str, space_id: Option<&str>) -> String {
    if let Some(space_id) = space_id {
        return match rag.query(space_id, query, 3).await {
            Ok(results) => {
                let content = results
                    .iter()
                    .map(|s| s.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                format!("Results from knowledge base {space_id}:\n{content}")
            }
            Err(err) => format!("Search failed: {err}"),
        };
    }

    let spaces = match rag.list_spaces() {
        Ok(spaces) => spaces,
        Err(err) => return format!("Search failed: {err}"),
    };
    if spaces.is_empty() {
        return "No knowledge bases available".to_string();
    }

    let mut all_results = Vec::new();
    for space in spaces.iter().take(FAN_OUT_SPACE_LIMIT) {
        match rag.query(&space.space_id, query, 2).await {
            Ok(results) => {
                for snippet in results {
                    all_results.push(format!("[{}] {}", space.space_id, snippet.content));
                }
            }
            Err(err) => {
                error!(space_id = %space.space_id, %err, "knowledge base search failed");
            }
        }
    }

    if all_results.is_empty() {
        "No matching content found".to_string()
    } else {
        all_results.join("\n\n")
    }
}

/// Lists all available knowledge bases as `(space_id, description)` pairs.
pub fn list_kbs<R: Retrieval>(rag: &R) -> String {
    match rag.list_spaces() {
        Ok(spaces) if spaces.is_empty() => "No knowledge bases available".to_string(),
        Ok(spaces) => {
            let entries = spaces
                .iter()
                .map(|s| format!("({}, {})", s.space_id, s.description))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Available knowledge bases: [{entries}]")
        }
        Err(err) => format!("Failed to list knowledge bases: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};

    use super::*;
    use crate::kb::{Snippet, SpaceInfo};

    struct FakeRag {
        spaces: Vec<SpaceInfo>,
        /// Space IDs whose queries fail.
        broken: Vec<String>,
    }

    impl FakeRag {
        fn with_spaces(ids: &[&str]) -> Self {
            Self {
                spaces: ids
                    .iter()
                    .map(|id| SpaceInfo {
                        space_id: (*id).to_string(),
                        description: format!("docs for {id}"),
                    })
                    .collect(),
                broken: Vec::new(),
            }
        }
    }

    impl Retrieval for FakeRag {
        async fn query(&self, space_id: &str, text: &str, top_k: usize) -> Result<Vec<Snippet>> {
            if self.broken.iter().any(|b| b == space_id) {
                bail!("index unavailable");
            }
            Ok((0..top_k)
                .map(|i| Snippet {
                    content: format!("{space_id} hit {i} for {text}"),
                    space_id: space_id.to_string(),
                    title: None,
                    source: None,
                })
                .collect())
        }

        fn list_spaces(&self) -> Result<Vec<SpaceInfo>> {
            Ok(self.spaces.clone())
        }
    }

    #[tokio::test]
    async fn test_search_specific_space() {
        let rag = FakeRag::with_spaces(&["wiki-a"]);
        let out = search_docs(&rag, "deploy", Some("wiki-a")).await;

        assert!(out.starts_with("Results from knowledge base wiki-a:"));
        assert!(out.contains("wiki-a hit 2 for deploy"));
    }

    #[tokio::test]
    async fn test_fan_out_is_capped_at_three_spaces() {
        let rag = FakeRag::with_spaces(&["a", "b", "c", "d"]);
        let out = search_docs(&rag, "q", None).await;

        assert!(out.contains("[a]"));
        assert!(out.contains("[c]"));
        assert!(!out.contains("[d]"));
    }

    #[tokio::test]
    async fn test_broken_space_is_skipped() {
        let mut rag = FakeRag::with_spaces(&["a", "b"]);
        rag.broken.push("a".to_string());
        let out = search_docs(&rag, "q", None).await;

        assert!(!out.contains("[a]"));
        assert!(out.contains("[b]"));
    }

    #[tokio::test]
    async fn test_no_spaces_available() {
        let rag = FakeRag::with_spaces(&[]);
        assert_eq!(search_docs(&rag, "q", None).await, "No knowledge bases available");
        assert_eq!(list_kbs(&rag), "No knowledge bases available");
    }

    #[test]
    fn test_list_kbs_formats_pairs() {
        let rag = FakeRag::with_spaces(&["a"]);
        assert_eq!(list_kbs(&rag), "Available knowledge bases: [(a, docs for a)]");
    }
}
