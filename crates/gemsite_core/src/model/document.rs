//! Nested content document and path-based mutation.
//!
//! # Responsibility
//! - Represent every editable text/media value of the site as one tree.
//! - Apply single scalar edits addressed by dotted paths
//!   (`"stickySection.items.0.title"`).
//!
//! # Invariants
//! - Scalar leaves are always strings; the tree owns its children, so it is
//!   acyclic and always serializable.
//! - `ContentDocument::update` never modifies the receiver; it returns a new,
//!   structurally independent snapshot or an error.
//! - Missing intermediate nodes are created on write, never on read.
//!
//! # Path policy
//! - A segment applied to a mapping is always a key, numeric or not.
//! - A segment applied to a sequence must be a canonical decimal index
//!   (`0`, `7`, `12`; no sign, no leading zeros).
//! - Writing at or past the end of a sequence extends it with empty mapping
//!   placeholders, at most `MAX_INDEX_GAP` new slots per write.
//! - A missing intermediate node becomes a sequence when the next segment is
//!   an index, otherwise a mapping.
//! - An empty text node on the path counts as missing and is replaced by a
//!   container; a non-empty text node on the path is an error.
//! - Paths are at most `MAX_PATH_DEPTH` segments, so written nesting always
//!   stays readable by the JSON parser used for storage and share links.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound on slots a single write may append to a sequence.
pub const MAX_INDEX_GAP: usize = 1024;

/// Longest accepted path, in segments. Kept well under the JSON reader's
/// nesting limit of 128.
pub const MAX_PATH_DEPTH: usize = 64;

const PATH_SEPARATOR: char = '.';

pub type MutationResult<T> = Result<T, MutationError>;

/// Reasons a path write is refused. The previous snapshot stays current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Path is empty or has an empty segment (`"a..b"`).
    InvalidPath(String),
    /// Path tries to descend through a non-empty text value.
    ScalarInPath { path: String, segment: String },
    /// Segment addressing a sequence is not a decimal index.
    NotAnIndex { path: String, segment: String },
    /// Index would extend a sequence by more than `MAX_INDEX_GAP` slots.
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
    /// Path has more than `MAX_PATH_DEPTH` segments.
    PathTooDeep { depth: usize, limit: usize },
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(path) => write!(f, "invalid content path `{path}`"),
            Self::ScalarInPath { path, segment } => write!(
                f,
                "cannot descend into text value at `{path}` (segment `{segment}`)"
            ),
            Self::NotAnIndex { path, segment } => write!(
                f,
                "segment `{segment}` is not a list index at `{path}`"
            ),
            Self::IndexOutOfRange { path, index, len } => write!(
                f,
                "index {index} at `{path}` is too far past list length {len}"
            ),
            Self::PathTooDeep { depth, limit } => write!(
                f,
                "content path has {depth} segments, limit is {limit}"
            ),
        }
    }
}

impl Error for MutationError {}

/// Input could not be read as a content tree (non-string scalar, non-object
/// root, malformed JSON).
#[derive(Debug)]
pub struct ShapeError(serde_json::Error);

impl ShapeError {
    pub fn inner(&self) -> &serde_json::Error {
        &self.0
    }
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "content does not have a valid document shape: {}", self.0)
    }
}

impl Error for ShapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for ShapeError {
    fn from(value: serde_json::Error) -> Self {
        Self(value)
    }
}

/// One node of the content tree.
///
/// Serialized as plain JSON: strings, arrays and objects. There is no
/// number/bool/null variant, so foreign JSON carrying those is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    List(Vec<ContentValue>),
    Map(BTreeMap<String, ContentValue>),
}

impl ContentValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Builds a mapping node from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ContentValue)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ContentValue]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ContentValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    fn is_vacant(&self) -> bool {
        matches!(self, Self::Text(value) if value.is_empty())
    }

    fn child(&self, segment: &str) -> Option<&ContentValue> {
        match self {
            Self::Map(entries) => entries.get(segment),
            Self::List(items) => parse_index(segment).and_then(|index| items.get(index)),
            Self::Text(_) => None,
        }
    }
}

/// Parsed dotted path. Always has at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    segments: Vec<String>,
}

impl ContentPath {
    pub fn parse(path: &str) -> MutationResult<Self> {
        if path.is_empty() {
            return Err(MutationError::InvalidPath(path.to_string()));
        }
        let segments = path
            .split(PATH_SEPARATOR)
            .map(str::to_string)
            .collect::<Vec<_>>();
        if segments.iter().any(String::is_empty) {
            return Err(MutationError::InvalidPath(path.to_string()));
        }
        if segments.len() > MAX_PATH_DEPTH {
            return Err(MutationError::PathTooDeep {
                depth: segments.len(),
                limit: MAX_PATH_DEPTH,
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dotted form of the first `len` segments, for error reporting.
    fn prefix(&self, len: usize) -> String {
        self.segments[..len].join(".")
    }
}

impl Display for ContentPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// The whole editable site content: a string-keyed mapping at the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument {
    root: BTreeMap<String, ContentValue>,
}

impl ContentDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from top-level `(key, value)` pairs.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ContentValue)>,
    {
        Self {
            root: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    /// Parses and shape-checks a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ShapeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Shape-checks an already parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ShapeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Compact JSON, the form used by storage and share links.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, ContentValue> {
        &self.root
    }

    /// Reads the node at `path`. Never creates nodes.
    pub fn get(&self, path: &str) -> Option<&ContentValue> {
        let path = ContentPath::parse(path).ok()?;
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.root.get(first)?;
        for segment in rest {
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub fn get_text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(ContentValue::as_text)
    }

    /// Returns a new snapshot with `value` written at `path`.
    ///
    /// The receiver is left untouched whether the write succeeds or not.
    ///
    /// # Errors
    /// - `InvalidPath` for empty paths or segments.
    /// - `ScalarInPath` when an intermediate segment hits non-empty text.
    /// - `NotAnIndex` / `IndexOutOfRange` for bad sequence segments.
    pub fn update(&self, path: &str, value: impl Into<String>) -> MutationResult<ContentDocument> {
        let path = ContentPath::parse(path)?;
        let mut next = self.clone();
        next.assign(&path, ContentValue::Text(value.into()))?;
        Ok(next)
    }

    /// Every text leaf as `(dotted path, value)`, in document order.
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        for (key, value) in &self.root {
            collect_leaves(key.clone(), value, &mut out);
        }
        out
    }

    fn assign(&mut self, path: &ContentPath, value: ContentValue) -> MutationResult<()> {
        let mut root = ContentValue::Map(std::mem::take(&mut self.root));
        let result = assign_at(&mut root, path, value);
        if let ContentValue::Map(entries) = root {
            self.root = entries;
        }
        result
    }
}

fn assign_at(root: &mut ContentValue, path: &ContentPath, value: ContentValue) -> MutationResult<()> {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return Err(MutationError::InvalidPath(path.to_string()));
    };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let child = slot_mut(current, segment, path, depth)?;
        if child.is_vacant() {
            *child = if parse_index(&segments[depth + 1]).is_some() {
                ContentValue::List(Vec::new())
            } else {
                ContentValue::empty_map()
            };
        }
        current = child;
    }

    let leaf = slot_mut(current, last, path, parents.len())?;
    *leaf = value;
    Ok(())
}

/// Resolves the child slot for `segment`, creating a vacant one if missing.
fn slot_mut<'a>(
    node: &'a mut ContentValue,
    segment: &str,
    path: &ContentPath,
    depth: usize,
) -> MutationResult<&'a mut ContentValue> {
    match node {
        ContentValue::Map(entries) => Ok(entries
            .entry(segment.to_string())
            .or_insert_with(|| ContentValue::Text(String::new()))),
        ContentValue::List(items) => {
            let index = parse_index(segment).ok_or_else(|| MutationError::NotAnIndex {
                path: path.prefix(depth),
                segment: segment.to_string(),
            })?;
            if index >= items.len() {
                let grow_by = index + 1 - items.len();
                if grow_by > MAX_INDEX_GAP {
                    return Err(MutationError::IndexOutOfRange {
                        path: path.prefix(depth),
                        index,
                        len: items.len(),
                    });
                }
                items.resize_with(index, ContentValue::empty_map);
                items.push(ContentValue::Text(String::new()));
            }
            Ok(&mut items[index])
        }
        ContentValue::Text(_) => Err(MutationError::ScalarInPath {
            path: path.prefix(depth),
            segment: segment.to_string(),
        }),
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|byte| byte.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

fn collect_leaves<'a>(prefix: String, value: &'a ContentValue, out: &mut Vec<(String, &'a str)>) {
    match value {
        ContentValue::Text(text) => out.push((prefix, text.as_str())),
        ContentValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_leaves(format!("{prefix}.{index}"), item, out);
            }
        }
        ContentValue::Map(entries) => {
            for (key, item) in entries {
                collect_leaves(format!("{prefix}.{key}"), item, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_index, ContentDocument, ContentPath, ContentValue, MutationError};

    #[test]
    fn parse_index_accepts_only_canonical_decimals() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("12"), Some(12));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("1a"), None);
        assert_eq!(parse_index(""), None);
    }

    #[test]
    fn path_parse_rejects_empty_segments() {
        assert!(ContentPath::parse("").is_err());
        assert!(ContentPath::parse("a..b").is_err());
        assert!(ContentPath::parse(".a").is_err());
        assert_eq!(
            ContentPath::parse("hero.title").unwrap().segments(),
            &["hero".to_string(), "title".to_string()]
        );
    }

    #[test]
    fn get_does_not_vivify() {
        let doc = ContentDocument::new();
        assert!(doc.get("a.b.c").is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn empty_text_on_path_is_replaced_by_container() {
        let doc = ContentDocument::from_entries([("hero", ContentValue::text(""))]);
        let next = doc.update("hero.title", "Welcome").unwrap();
        assert_eq!(next.get_text("hero.title"), Some("Welcome"));
    }

    #[test]
    fn error_reports_prefix_of_conflicting_node() {
        let doc = ContentDocument::from_entries([(
            "hero",
            ContentValue::map([("title", ContentValue::text("Hi"))]),
        )]);
        let err = doc.update("hero.title.size", "big").unwrap_err();
        assert_eq!(
            err,
            MutationError::ScalarInPath {
                path: "hero.title".to_string(),
                segment: "size".to_string(),
            }
        );
    }

    #[test]
    fn leaves_lists_every_text_with_path() {
        let doc = ContentDocument::from_entries([(
            "items",
            ContentValue::List(vec![ContentValue::map([("title", ContentValue::text("A"))])]),
        )]);
        assert_eq!(doc.leaves(), vec![("items.0.title".to_string(), "A")]);
    }
}
