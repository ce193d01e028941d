//! Dashboard and document payloads.

use serde::{Deserialize, Serialize};

/// `GET /api/dashboard/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub total_documents: u64,
    pub delta_documents: i64,
    pub queries_last_7d: u64,
    pub delta_queries: i64,
    pub avg_answer_time_ms: Option<f64>,
    pub delta_answer_time: f64,
    pub answer_confidence: Option<f64>,
    pub delta_confidence: f64,
    pub org_users: u64,
}

/// One day of the `GET /api/analytics/usage` series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePoint {
    pub date: String,
    #[serde(default)]
    pub count: u64,
}

/// Document identifiers are numeric today, but strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Document {
    /// Title, falling back to the file name, then the id.
    pub fn display_name(&self) -> String {
        self.title
            .as_deref()
            .or(self.filename.as_deref())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Document {}", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tolerates_nulls_and_missing_fields() {
        let summary: DashboardSummary = serde_json::from_str(
            r#"{"total_documents": 5, "avg_answer_time_ms": null, "delta_documents": -2}"#,
        )
        .unwrap();
        assert_eq!(summary.total_documents, 5);
        assert_eq!(summary.delta_documents, -2);
        assert!(summary.avg_answer_time_ms.is_none());
        assert_eq!(summary.org_users, 0);
    }

    #[test]
    fn test_document_id_accepts_numbers_and_strings() {
        let docs: Vec<Document> =
            serde_json::from_str(r#"[{"id": 1}, {"id": "a1b2", "title": "Report"}]"#).unwrap();
        assert_eq!(docs[0].id, DocumentId::Int(1));
        assert_eq!(docs[1].id.to_string(), "a1b2");
    }

    #[test]
    fn test_document_display_name() {
        let doc = Document {
            id: DocumentId::Int(7),
            title: None,
            filename: Some("scan.pdf".to_string()),
            created_at: None,
        };
        assert_eq!(doc.display_name(), "scan.pdf");

        let untitled = Document {
            filename: None,
            ..doc
        };
        assert_eq!(untitled.display_name(), "Document 7");
    }
}
