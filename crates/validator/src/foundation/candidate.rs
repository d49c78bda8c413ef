//! Candidate values fed into validation nodes.
//!
//! A [`Candidate`] is an explicit tagged variant: refinements decide whether
//! they apply by matching on the variant instead of probing the shape of an
//! arbitrary value.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

/// Keyed structure produced by record nodes and accepted as record input.
pub type Record = IndexMap<String, Candidate>;

// ============================================================================
// CANDIDATE
// ============================================================================

/// A value submitted for validation.
///
/// `Absent` models a field that was never supplied, which is distinct from an
/// explicit `Null`. Optional nodes accept `Absent` only.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Candidate {
    /// No value was supplied.
    #[default]
    Absent,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A text value.
    Text(String),
    /// A file-like value.
    Binary(FileCandidate),
    /// An ordered sequence.
    List(Vec<Candidate>),
    /// A keyed structure.
    Record(Record),
}

impl Candidate {
    /// Builds a record candidate from key/value pairs.
    pub fn record<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Candidate)>,
    {
        Self::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a list candidate.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Candidate>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&FileCandidate> {
        match self {
            Self::Binary(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Candidate]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key of a record candidate.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Candidate> {
        self.as_record().and_then(|map| map.get(key))
    }

    /// Follows a dot-separated path through records and lists.
    ///
    /// ```rust,ignore
    /// let value = Candidate::record([("photos", Candidate::list(["a", "b"]))]);
    /// assert_eq!(value.pointer("photos.1").and_then(Candidate::as_text), Some("b"));
    /// ```
    #[must_use]
    pub fn pointer(&self, path: &str) -> Option<&Candidate> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, segment| match current {
            Self::Record(map) => map.get(segment),
            Self::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Sets the value at a dot-separated path, creating intermediate records.
    ///
    /// Non-record intermediates are replaced by records. List indices are
    /// honoured when they are in bounds.
    pub fn set_pointer(&mut self, path: &str, value: Candidate) {
        let current = std::mem::take(self);
        *self = current.with_pointer(path, value);
    }

    fn with_pointer(self, path: &str, value: Candidate) -> Self {
        let (head, rest) = path.split_once('.').map_or((path, None), |(h, r)| (h, Some(r)));
        let place = |existing: Candidate| match rest {
            Some(rest) => existing.with_pointer(rest, value),
            None => value,
        };
        match self {
            Self::List(mut items) => match head.parse::<usize>().ok().filter(|&i| i < items.len()) {
                Some(index) => {
                    let existing = std::mem::take(&mut items[index]);
                    items[index] = place(existing);
                    Self::List(items)
                }
                None => Self::record([(head, place(Self::Absent))]),
            },
            Self::Record(mut map) => {
                match map.get_mut(head) {
                    Some(slot) => {
                        let existing = std::mem::take(slot);
                        *slot = place(existing);
                    }
                    None => {
                        map.insert(head.to_owned(), place(Self::Absent));
                    }
                }
                Self::Record(map)
            }
            _ => Self::record([(head, place(Self::Absent))]),
        }
    }

    /// Canonical string form used as a cache key component.
    ///
    /// Record keys are sorted and absent entries skipped, so two candidates
    /// that validate identically produce the same fingerprint. File content
    /// contributes through a hash instead of its raw bytes, alongside its
    /// name, type, size and modification time.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut out = String::new();
        self.write_fingerprint(&mut out);
        out
    }

    fn write_fingerprint(&self, out: &mut String) {
        match self {
            Self::Absent => out.push('~'),
            Self::Null => out.push_str("null"),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::Number(n) => {
                let _ = write!(out, "{n}");
            }
            Self::Text(s) => {
                let _ = write!(out, "{s:?}");
            }
            Self::Binary(file) => {
                let _ = write!(
                    out,
                    "file({:?},{:?},{},{:?},{:016x})",
                    file.name,
                    file.mime_type,
                    file.size(),
                    file.last_modified,
                    file.content_hash()
                );
            }
            Self::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_fingerprint(out);
                }
                out.push(']');
            }
            Self::Record(map) => {
                let mut keys: Vec<&String> = map
                    .iter()
                    .filter(|(_, v)| !v.is_absent())
                    .map(|(k, _)| k)
                    .collect();
                keys.sort();
                out.push('{');
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{key:?}:");
                    map[key].write_fingerprint(out);
                }
                out.push('}');
            }
        }
    }

    /// Converts a JSON document into a candidate.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, Self::from_json(v))).collect())
            }
        }
    }

    /// Converts the candidate into JSON. Files become a descriptor object
    /// without their content; absent record entries are dropped.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Value, json};
        match self {
            Self::Absent | Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => json!(n),
            Self::Text(s) => Value::String(s.clone()),
            Self::Binary(file) => json!({
                "name": file.name,
                "type": file.mime_type,
                "size": file.size(),
            }),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Record(map) => Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_absent())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Candidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Candidate {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Candidate {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Candidate {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Candidate {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Candidate {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<FileCandidate> for Candidate {
    fn from(value: FileCandidate) -> Self {
        Self::Binary(value)
    }
}

impl From<Record> for Candidate {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl<T: Into<Candidate>> From<Vec<T>> for Candidate {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Candidate>> From<Option<T>> for Candidate {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

// ============================================================================
// FILE CANDIDATE
// ============================================================================

/// A file-like value: name, MIME type and content.
///
/// The size is always the content length, so a recompressed file reports its
/// new size without extra bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    name: String,
    mime_type: String,
    bytes: Bytes,
    last_modified: Option<i64>,
}

impl FileCandidate {
    /// Creates a file candidate.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
            last_modified: None,
        }
    }

    /// Sets the last-modified timestamp (milliseconds since the epoch).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_last_modified(mut self, millis: i64) -> Self {
        self.last_modified = Some(millis);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn last_modified(&self) -> Option<i64> {
        self.last_modified
    }

    /// Lower-cased extension of the file name, without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Hash of the file content, used by [`Candidate::fingerprint`].
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.bytes.hash(&mut hasher);
        hasher.finish()
    }
}

// ============================================================================
// ACCESS TRAITS
// ============================================================================

/// Output types that may carry text.
///
/// Text refinements consult this to decide applicability; values without
/// text pass through unchanged.
pub trait TextLike {
    fn text(&self) -> Option<&str>;
}

impl TextLike for String {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl TextLike for Candidate {
    fn text(&self) -> Option<&str> {
        self.as_text()
    }
}

impl<T: TextLike> TextLike for Option<T> {
    fn text(&self) -> Option<&str> {
        self.as_ref().and_then(TextLike::text)
    }
}

/// Output types that may carry a file.
pub trait FileLike: Sized {
    fn file(&self) -> Option<&FileCandidate>;

    /// Replaces the carried file, e.g. after recompression.
    #[must_use]
    fn replace_file(self, file: FileCandidate) -> Self;
}

impl FileLike for FileCandidate {
    fn file(&self) -> Option<&FileCandidate> {
        Some(self)
    }

    fn replace_file(self, file: FileCandidate) -> Self {
        file
    }
}

impl FileLike for Candidate {
    fn file(&self) -> Option<&FileCandidate> {
        self.as_file()
    }

    fn replace_file(self, file: FileCandidate) -> Self {
        match self {
            Self::Binary(_) => Self::Binary(file),
            other => other,
        }
    }
}

impl<T: FileLike> FileLike for Option<T> {
    fn file(&self) -> Option<&FileCandidate> {
        self.as_ref().and_then(FileLike::file)
    }

    fn replace_file(self, file: FileCandidate) -> Self {
        self.map(|inner| inner.replace_file(file))
    }
}

// ============================================================================
// TESTS
// ============================================================================
