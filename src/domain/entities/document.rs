use serde::{Deserialize, Serialize};

/// A passage returned by a similarity search. Lives for one query only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl RetrievedDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
            score: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Concatenates document texts, in the given order, separated by a blank line.
pub fn join_context(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_context_preserves_order() {
        let docs = vec![
            RetrievedDocument::new("Data Analyst, remote"),
            RetrievedDocument::new("Backend Engineer, Berlin"),
        ];

        assert_eq!(
            join_context(&docs),
            "Data Analyst, remote\n\nBackend Engineer, Berlin"
        );
    }

    #[test]
    fn test_join_context_empty() {
        assert_eq!(join_context(&[]), "");
    }
}
