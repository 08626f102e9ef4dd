//! Upload acceptance rules.

use std::path::Path;

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};

/// Content type assumed for inputs carrying no usable hint.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Reject sizes over the configured limit.
pub fn check_size(size: u64, config: &IngestConfig) -> Result<()> {
    if size > config.max_upload_size {
        return Err(IngestError::TooLarge {
            size,
            max: config.max_upload_size,
        });
    }
    Ok(())
}

/// Strip parameters and case from a MIME type: `Audio/MPEG; x=1` -> `audio/mpeg`.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// The effective content type: the declared one if present, else inferred
/// from the file extension.
pub fn resolve_content_type(declared: Option<&str>, path: Option<&Path>) -> String {
    if let Some(declared) = declared {
        return normalize_content_type(declared);
    }

    let is_mp3 = path
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));

    if is_mp3 {
        "audio/mpeg".to_string()
    } else {
        FALLBACK_CONTENT_TYPE.to_string()
    }
}

/// Resolve the content type and check it against the allow-list.
pub fn check_content_type(
    declared: Option<&str>,
    path: Option<&Path>,
    config: &IngestConfig,
) -> Result<String> {
    let content_type = resolve_content_type(declared, path);
    let allowed = config
        .allowed_content_types
        .iter()
        .any(|ty| normalize_content_type(ty) == content_type);

    if !allowed {
        return Err(IngestError::UnsupportedContentType(content_type));
    }
    Ok(content_type)
}
