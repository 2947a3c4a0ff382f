// crates/descheduler-policy-cli/src/document.rs
// ============================================================================
// Module: Policy Document I/O
// Description: Bounded loading, parsing, and rendering of v1alpha2 documents.
// Purpose: Turn files into versioned documents and back, failing closed.
// Dependencies: serde_json, serde_yaml, thiserror, descheduler-policy-api
// ============================================================================

//! ## Overview
//! Documents are read with a hard size limit, decoded as YAML or JSON, and
//! must carry the v1alpha2 policy type header. Rendering writes the same two
//! formats.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use descheduler_policy_api::v1alpha2;
use thiserror::Error;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Serialization format of a policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML.
    Yaml,
    /// JSON.
    Json,
}

impl DocumentFormat {
    /// Picks a format from the file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Document loading and rendering errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path being read.
        path: String,
        /// I/O error message.
        message: String,
    },
    /// File size exceeds the configured limit.
    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
    /// Document is not UTF-8.
    #[error("document must be utf-8")]
    NotUtf8,
    /// YAML or JSON decoding failed.
    #[error("failed to parse document: {0}")]
    Parse(String),
    /// Type header does not name a v1alpha2 policy.
    #[error("unsupported document type: apiVersion '{api_version}', kind '{kind}'")]
    Header {
        /// Declared apiVersion.
        api_version: String,
        /// Declared kind.
        kind: String,
    },
    /// Rendering failed.
    #[error("failed to render document: {0}")]
    Render(String),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Reads, parses, and header-checks a policy document.
///
/// # Errors
///
/// Returns [`DocumentError`] when any stage fails.
pub fn load_document(
    path: &Path,
    format: DocumentFormat,
    max_bytes: usize,
) -> Result<v1alpha2::DeschedulerPolicy, DocumentError> {
    let bytes = read_bytes_with_limit(path, max_bytes)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| DocumentError::NotUtf8)?;
    parse_document(text, format)
}

/// Parses document text and checks the type header.
///
/// # Errors
///
/// Returns [`DocumentError::Parse`] or [`DocumentError::Header`].
pub fn parse_document(
    text: &str,
    format: DocumentFormat,
) -> Result<v1alpha2::DeschedulerPolicy, DocumentError> {
    let policy: v1alpha2::DeschedulerPolicy = match format {
        DocumentFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|err| DocumentError::Parse(err.to_string()))?
        }
        DocumentFormat::Json => {
            serde_json::from_str(text).map_err(|err| DocumentError::Parse(err.to_string()))?
        }
    };
    if !policy.type_meta.is_policy() {
        return Err(DocumentError::Header {
            api_version: policy.type_meta.api_version,
            kind: policy.type_meta.kind,
        });
    }
    Ok(policy)
}

/// Renders a document in the requested format.
///
/// # Errors
///
/// Returns [`DocumentError::Render`] when serialization fails.
pub fn render_document(
    policy: &v1alpha2::DeschedulerPolicy,
    format: DocumentFormat,
) -> Result<String, DocumentError> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml::to_string(policy).map_err(|err| DocumentError::Render(err.to_string()))
        }
        DocumentFormat::Json => serde_json::to_string_pretty(policy)
            .map_err(|err| DocumentError::Render(err.to_string())),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, DocumentError> {
    let io_error = |err: std::io::Error| DocumentError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    };
    let file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(DocumentError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() > max_bytes {
        return Err(DocumentError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}
