//! Case-insensitive key resolution over a configuration tree.
//!
//! Every function returns `None` when the key is missing or the value has
//! the wrong type; callers decide whether absence is fatal. When a mapping
//! holds several keys that differ only by case, the first one in document
//! order wins.

use super::value::{Mapping, Value};

/// Anything that can be searched for a key: a mapping, or a node that may
/// hold one. Non-mapping nodes behave as empty mappings.
pub trait MappingNode {
    /// Entries of the mapping, in document order.
    fn entries(&self) -> &[(String, Value)];
}

impl MappingNode for Value {
    fn entries(&self) -> &[(String, Value)] {
        match self {
            Self::Map(m) => m,
            _ => &[],
        }
    }
}

impl MappingNode for Mapping {
    fn entries(&self) -> &[(String, Value)] {
        self
    }
}

impl<T: MappingNode + ?Sized> MappingNode for Option<&T> {
    fn entries(&self) -> &[(String, Value)] {
        match self {
            Some(n) => n.entries(),
            None => &[],
        }
    }
}

fn keys_match(candidate: &str, wanted: &str) -> bool {
    candidate == wanted || candidate.to_lowercase() == wanted.to_lowercase()
}

/// Return the value stored under `key`, matched case-insensitively.
#[must_use]
pub fn lookup<'a, N: MappingNode + ?Sized>(node: &'a N, key: &str) -> Option<&'a Value> {
    node.entries()
        .iter()
        .find(|(k, _)| keys_match(k, key))
        .map(|(_, v)| v)
}

/// Return the mapping stored under `key`.
#[must_use]
pub fn lookup_map<'a, N: MappingNode + ?Sized>(node: &'a N, key: &str) -> Option<&'a Mapping> {
    lookup(node, key).and_then(Value::as_map)
}

/// Return the string stored under `key`.
#[must_use]
pub fn lookup_string<'a, N: MappingNode + ?Sized>(node: &'a N, key: &str) -> Option<&'a str> {
    lookup(node, key).and_then(Value::as_str)
}

/// Return the string items of the sequence stored under `key`.
///
/// Items that are not strings are skipped.
#[must_use]
pub fn lookup_list<N: MappingNode + ?Sized>(node: &N, key: &str) -> Option<Vec<String>> {
    let items = lookup(node, key)?.as_seq()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Return any scalar stored under `key` rendered as text.
///
/// Toggles written as YAML booleans (`dark_mode: true`) and as strings
/// (`dark_mode: "true"`) resolve to the same text.
#[must_use]
pub fn lookup_scalar<N: MappingNode + ?Sized>(node: &N, key: &str) -> Option<String> {
    lookup(node, key).and_then(Value::scalar_text)
}

/// Return the string under `key`, or, when `key` holds a mapping, the first
/// string value inside that mapping.
///
/// Install manifests sometimes nest a directory one level deeper than
/// expected (`global log directory: {path: C:\logs}`); this accepts both.
#[must_use]
pub fn lookup_string_or_first_nested<'a, N: MappingNode + ?Sized>(
    node: &'a N,
    key: &str,
) -> Option<&'a str> {
    match lookup(node, key)? {
        Value::Str(s) => Some(s),
        Value::Map(m) => m.iter().find_map(|(_, v)| v.as_str()),
        _ => None,
    }
}

/// Resolve a dotted path such as `"a.b.c"` one segment at a time.
///
/// Returns `None` as soon as a segment is missing or an intermediate node is
/// not a mapping.
#[must_use]
pub fn lookup_path<'a, N: MappingNode + ?Sized>(node: &'a N, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = lookup(node, first)?;
    for segment in segments {
        current = lookup(current.as_map()?, segment)?;
    }
    Some(current)
}

/// Dotted-path variant of [`lookup_string`].
#[must_use]
pub fn path_string<'a, N: MappingNode + ?Sized>(node: &'a N, path: &str) -> Option<&'a str> {
    lookup_path(node, path).and_then(Value::as_str)
}

/// Dotted-path variant of [`lookup_map`].
#[must_use]
pub fn path_map<'a, N: MappingNode + ?Sized>(node: &'a N, path: &str) -> Option<&'a Mapping> {
    lookup_path(node, path).and_then(Value::as_map)
}

/// Dotted-path variant of [`lookup_list`].
#[must_use]
pub fn path_list<N: MappingNode + ?Sized>(node: &N, path: &str) -> Option<Vec<String>> {
    let items = lookup_path(node, path)?.as_seq()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
