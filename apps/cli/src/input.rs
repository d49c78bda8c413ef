//! JSON input documents.
//!
//! Plain JSON maps onto candidates directly. An object with a `"$file"` key
//! loads that file, relative to the document's directory, as a binary
//! candidate:
//!
//! ```json
//! { "avatar": { "$file": "me.png" } }
//! ```
//!
//! The MIME type is sniffed from the content unless `"$type"` is given, and
//! `"$name"` overrides the file name.

use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{Context, bail};
use formguard_validator::media::sniff_mime;
use formguard_validator::{Candidate, FileCandidate, FileCategory};
use serde_json::{Map, Value};

const FILE_KEY: &str = "$file";
const FALLBACK_MIME: &str = "application/octet-stream";
const ZIP_MIME: &str = "application/zip";

/// Reads and converts the document at `path`.
pub fn load(path: &Path) -> anyhow::Result<Candidate> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read input {}", path.display()))?;
    let json: Value = serde_json::from_str(&raw)
        .with_context(|| format!("input {} is not valid JSON", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    convert(json, base)
}

/// Converts a JSON value, resolving file references against `base`.
pub fn convert(value: Value, base: &Path) -> anyhow::Result<Candidate> {
    Ok(match value {
        Value::Object(map) if map.contains_key(FILE_KEY) => Candidate::Binary(load_file(&map, base)?),
        Value::Object(map) => Candidate::Record(
            map.into_iter()
                .map(|(key, value)| Ok((key, convert(value, base)?)))
                .collect::<anyhow::Result<_>>()?,
        ),
        Value::Array(items) => Candidate::List(
            items
                .into_iter()
                .map(|item| convert(item, base))
                .collect::<anyhow::Result<_>>()?,
        ),
        other => Candidate::from_json(other),
    })
}

/// Sniffed MIME type, except that a bare zip named like a document is left to
/// the extension table.
fn sniffed_mime(name: &str, bytes: &[u8]) -> Option<&'static str> {
    let document_name = name
        .rsplit_once('.')
        .and_then(|(_, ext)| FileCategory::from_extension(ext))
        == Some(FileCategory::Document);
    sniff_mime(bytes).filter(|mime| !(document_name && *mime == ZIP_MIME))
}

fn load_file(reference: &Map<String, Value>, base: &Path) -> anyhow::Result<FileCandidate> {
    let Some(relative) = reference.get(FILE_KEY).and_then(Value::as_str) else {
        bail!("\"{FILE_KEY}\" must be a path string");
    };
    let path = base.join(relative);
    let bytes = std::fs::read(&path).with_context(|| format!("cannot read file {}", path.display()))?;

    let name = match reference.get("$name").and_then(Value::as_str) {
        Some(name) => name.to_owned(),
        None => path
            .file_name()
            .map_or_else(|| relative.to_owned(), |n| n.to_string_lossy().into_owned()),
    };
    let mime_type = reference
        .get("$type")
        .and_then(Value::as_str)
        .or_else(|| sniffed_mime(&name, &bytes))
        .unwrap_or(FALLBACK_MIME)
        .to_owned();
    let modified = std::fs::metadata(&path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .and_then(|since| i64::try_from(since.as_millis()).ok());

    tracing::debug!(path = %path.display(), mime_type = %mime_type, size = bytes.len(), "loaded file");

    let file = FileCandidate::new(name, mime_type, bytes);
    Ok(match modified {
        Some(millis) => file.with_last_modified(millis),
        None => file,
    })
}
