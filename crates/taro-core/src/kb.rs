//! Knowledge-base retrieval contract.
//!
//! The build/query subsystem (document fetch, chunking, vector search) is a
//! collaborator; the bot only depends on this interface. Implementations
//! typically wrap a local vector store built from synced wiki spaces.

use anyhow::Result;

/// One ranked result snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub content: String,
    /// Wiki space the snippet came from.
    pub space_id: String,
    pub title: Option<String>,
    /// Source link, when the original document is addressable.
    pub source: Option<String>,
}

/// A knowledge base available for querying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceInfo {
    pub space_id: String,
    pub description: String,
}

/// Retrieval service contract.
pub trait Retrieval: Send + Sync {
    /// Returns the `top_k` snippets most similar to `text` within a space.
    fn query(
        &self,
        space_id: &str,
        text: &str,
        top_k: usize,
    ) -> impl Future<Output = Result<Vec<Snippet>>> + Send;

    /// Lists the knowledge bases currently available.
    ///
    /// # Errors
    /// Returns an error if the storage folder cannot be enumerated.
    fn list_spaces(&self) -> Result<Vec<SpaceInfo>>;
}
