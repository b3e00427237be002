//! Body-content change detection
//!
//! Decides whether a document's substantive body changed since the last
//! recorded baseline. Baselines are process-lifetime only; a lost baseline
//! conservatively reports "changed". Only the body is inspected, so
//! header-only edits never trigger a version bump.

use dashmap::DashMap;
use docver_core::{DocumentId, MetadataProcessor, VersionError};
use std::sync::Arc;

pub struct FileChangeDetector {
    processor: Arc<dyn MetadataProcessor>,
    /// Normalized body snapshots, keyed by document
    baselines: DashMap<DocumentId, String>,
}

impl FileChangeDetector {
    pub fn new(processor: Arc<dyn MetadataProcessor>) -> Self {
        Self {
            processor,
            baselines: DashMap::new(),
        }
    }

    /// True if no baseline exists, else true iff the normalized body
    /// differs from the baseline
    pub async fn has_body_content_changed(
        &self,
        document: &DocumentId,
    ) -> Result<bool, VersionError> {
        let body = self.processor.extract_body_content(document).await?;
        let normalized = normalize_body(&body);

        Ok(match self.baselines.get(document) {
            Some(baseline) => *baseline != normalized,
            None => true,
        })
    }

    /// Snapshot the current normalized body as the new baseline
    pub async fn update_baseline(&self, document: &DocumentId) -> Result<(), VersionError> {
        let body = self.processor.extract_body_content(document).await?;
        self.baselines
            .insert(document.clone(), normalize_body(&body));
        Ok(())
    }

    pub fn clear_baseline(&self, document: &DocumentId) {
        self.baselines.remove(document);
    }
}

/// Normalize a body so formatting churn compares equal
///
/// Line endings are unified, runs of non-newline whitespace collapse to one
/// space, runs of blank lines collapse to a single blank line, and both ends
/// are trimmed. Real textual edits survive normalization.
pub fn normalize_body(body: &str) -> String {
    let unified = body.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0usize;
    for raw in unified.split('\n') {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            blank_run += 1;
            if blank_run <= 1 {
                lines.push(String::new());
            }
        } else {
            blank_run = 0;
            lines.push(collapsed);
        }
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings_compare_equal() {
        assert_eq!(normalize_body("a\r\nb\r\n"), normalize_body("a\nb\n"));
        assert_eq!(normalize_body("a\rb"), normalize_body("a\nb"));
    }

    #[test]
    fn test_trailing_spaces_compare_equal() {
        assert_eq!(normalize_body("hello world  \n"), normalize_body("hello world\n"));
        assert_eq!(normalize_body("hello   world"), normalize_body("hello world"));
    }

    #[test]
    fn test_blank_line_runs_compare_equal() {
        assert_eq!(normalize_body("a\n\n\nb"), normalize_body("a\n\nb"));
        assert_eq!(normalize_body("a\n\n\n\n\nb"), normalize_body("a\n\nb"));
        // A whitespace-only line is a blank line
        assert_eq!(normalize_body("a\n  \n  \nb"), normalize_body("a\n\nb"));
    }

    #[test]
    fn test_single_blank_line_is_preserved() {
        assert_ne!(normalize_body("a\n\nb"), normalize_body("a\nb"));
    }

    #[test]
    fn test_word_edits_are_detected() {
        assert_ne!(normalize_body("hello world"), normalize_body("hello there"));
        assert_ne!(normalize_body("hello world"), normalize_body("hello"));
        assert_ne!(normalize_body("hello"), normalize_body("hello again"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["a\r\n\r\n\r\nb  c", "  x \n\n\n\n y ", "", "one two"] {
            let once = normalize_body(input);
            assert_eq!(normalize_body(&once), once);
        }
    }

    struct StaticBody(parking_lot::Mutex<String>);

    #[async_trait::async_trait]
    impl MetadataProcessor for StaticBody {
        async fn extract(
            &self,
            _document: &DocumentId,
        ) -> Result<docver_core::DocumentMetadata, VersionError> {
            Ok(docver_core::DocumentMetadata::default())
        }

        async fn update(
            &self,
            _document: &DocumentId,
            _patch: docver_core::MetadataPatch,
        ) -> Result<(), VersionError> {
            Ok(())
        }

        async fn extract_body_content(
            &self,
            _document: &DocumentId,
        ) -> Result<String, VersionError> {
            Ok(self.0.lock().clone())
        }
    }

    #[tokio::test]
    async fn test_lost_baseline_conservatively_reports_changed() {
        let processor = Arc::new(StaticBody(parking_lot::Mutex::new("stable body".to_string())));
        let detector = FileChangeDetector::new(processor);
        let doc = DocumentId::new("guide.md");

        // No baseline yet
        assert!(detector.has_body_content_changed(&doc).await.unwrap());

        detector.update_baseline(&doc).await.unwrap();
        assert!(!detector.has_body_content_changed(&doc).await.unwrap());

        detector.clear_baseline(&doc);
        assert!(detector.has_body_content_changed(&doc).await.unwrap());
    }
}
