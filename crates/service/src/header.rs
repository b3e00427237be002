//! Structured-header (frontmatter) metadata processing
//!
//! The header is a `---`-delimited `key: value` block preceding the free-form
//! body. Rewrites are line-based so unrelated header fields and the body are
//! preserved byte-for-byte, including their original line terminators.

use async_trait::async_trait;
use docver_core::{DocumentId, DocumentMetadata, MetadataPatch, MetadataProcessor, VersionError};
use std::path::Path;
use tokio::fs;

const DELIMITER: &str = "---";

/// Fields this subsystem owns, in the order synthesized headers use
const FIELD_VERSION: &str = "version";
const FIELD_OWNER: &str = "owner";
const FIELD_CREATED_BY: &str = "created_by";
const FIELD_LAST_MODIFIED: &str = "last_modified";

/// Filesystem-backed [`MetadataProcessor`] where the document id is a path
#[derive(Debug, Default, Clone, Copy)]
pub struct FrontmatterProcessor;

impl FrontmatterProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetadataProcessor for FrontmatterProcessor {
    async fn extract(&self, document: &DocumentId) -> Result<DocumentMetadata, VersionError> {
        let content = fs::read_to_string(Path::new(document.as_str())).await?;
        parse_header(&content, document)
    }

    async fn update(
        &self,
        document: &DocumentId,
        patch: MetadataPatch,
    ) -> Result<(), VersionError> {
        let path = Path::new(document.as_str());
        let content = fs::read_to_string(path).await?;
        let rewritten = rewrite_header(&content, &patch, document)?;
        fs::write(path, rewritten).await?;
        Ok(())
    }

    async fn extract_body_content(&self, document: &DocumentId) -> Result<String, VersionError> {
        let content = fs::read_to_string(Path::new(document.as_str())).await?;
        Ok(body_content(&content, document)?.to_string())
    }
}

/// Strip one trailing line terminator, returning (text, terminator)
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(text) = line.strip_suffix("\r\n") {
        (text, "\r\n")
    } else if let Some(text) = line.strip_suffix('\n') {
        (text, "\n")
    } else {
        (line, "")
    }
}

fn has_header(content: &str) -> bool {
    content
        .split_inclusive('\n')
        .next()
        .map(|first| split_terminator(first).0.trim_end() == DELIMITER)
        .unwrap_or(false)
}

/// Parse the header block into metadata
///
/// No header at all yields placeholder defaults; an opening delimiter with
/// no closing one, or a non-blank header line without `:`, is a parse error.
fn parse_header(content: &str, document: &DocumentId) -> Result<DocumentMetadata, VersionError> {
    if !has_header(content) {
        return Ok(DocumentMetadata::default());
    }

    let mut metadata = DocumentMetadata::default();
    for line in content.split_inclusive('\n').skip(1) {
        let text = split_terminator(line).0;
        if text.trim_end() == DELIMITER {
            return Ok(metadata);
        }
        if text.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = text.split_once(':') else {
            return Err(VersionError::parse(
                document.clone(),
                format!("header line without ':': {:?}", text),
            ));
        };
        let value = value.trim();
        match key.trim() {
            FIELD_VERSION => metadata.version = value.to_string(),
            FIELD_OWNER => metadata.owner = value.to_string(),
            FIELD_CREATED_BY => metadata.created_by = Some(value.to_string()),
            FIELD_LAST_MODIFIED => metadata.last_modified = Some(value.to_string()),
            _ => {}
        }
    }

    Err(VersionError::parse(
        document.clone(),
        "unterminated header block",
    ))
}

/// Content after the header block; the whole document when no header exists
fn body_content<'a>(content: &'a str, document: &DocumentId) -> Result<&'a str, VersionError> {
    if !has_header(content) {
        return Ok(content);
    }

    let mut offset = 0usize;
    for (i, line) in content.split_inclusive('\n').enumerate() {
        offset += line.len();
        if i > 0 && split_terminator(line).0.trim_end() == DELIMITER {
            return Ok(&content[offset..]);
        }
    }

    Err(VersionError::parse(
        document.clone(),
        "unterminated header block",
    ))
}

/// Merge the patch into the header, preserving everything else verbatim
///
/// Existing lines for patched keys are rewritten in place; patched keys not
/// present yet are appended just before the closing delimiter. Documents
/// without a header get one synthesized at the top.
fn rewrite_header(
    content: &str,
    patch: &MetadataPatch,
    document: &DocumentId,
) -> Result<String, VersionError> {
    let mut pending: Vec<(&str, &String)> = Vec::new();
    if let Some(v) = &patch.version {
        pending.push((FIELD_VERSION, v));
    }
    if let Some(v) = &patch.owner {
        pending.push((FIELD_OWNER, v));
    }
    if let Some(v) = &patch.created_by {
        pending.push((FIELD_CREATED_BY, v));
    }
    if let Some(v) = &patch.last_modified {
        pending.push((FIELD_LAST_MODIFIED, v));
    }

    if !has_header(content) {
        let mut out = String::with_capacity(content.len() + 128);
        out.push_str(DELIMITER);
        out.push('\n');
        for (key, value) in &pending {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(content);
        return Ok(out);
    }

    let mut out = String::with_capacity(content.len() + 128);
    let mut in_header = true;
    for (i, line) in content.split_inclusive('\n').enumerate() {
        if i == 0 || !in_header {
            out.push_str(line);
            continue;
        }

        let (text, terminator) = split_terminator(line);
        if text.trim_end() == DELIMITER {
            // Keys not found in the existing header land before the close
            for (key, value) in pending.iter() {
                out.push_str(&format!("{}: {}\n", key, value));
            }
            pending.clear();
            out.push_str(line);
            in_header = false;
            continue;
        }

        if let Some((key, _)) = text.split_once(':') {
            let key = key.trim();
            if let Some(pos) = pending.iter().position(|(k, _)| *k == key) {
                let (_, value) = pending.remove(pos);
                out.push_str(&format!("{}: {}{}", key, value, terminator));
                continue;
            }
        }
        out.push_str(line);
    }

    if in_header {
        return Err(VersionError::parse(
            document.clone(),
            "unterminated header block",
        ));
    }
    Ok(out)
}
