//! Loosely-typed configuration tree parsed from a YAML document.
//!
//! The tree keeps mapping entries in document order so that case-insensitive
//! lookups can deterministically pick the first matching key.

/// An ordered list of `(key, value)` pairs.
///
/// Keys are kept exactly as written in the document; matching against them
/// is done by the functions in [`super::lookup`].
pub type Mapping = Vec<(String, Value)>;

/// A node of a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Explicit null (`~`, `null`, or an empty value).
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// String scalar. Floats and out-of-range integers are kept here in their
    /// textual form.
    Str(String),
    /// Sequence of nodes.
    Seq(Vec<Self>),
    /// Mapping of string keys to nodes, in document order.
    Map(Mapping),
}

impl Value {
    /// Return the inner mapping, if this node is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Return the inner string, if this node is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Return the inner sequence, if this node is one.
    #[must_use]
    pub fn as_seq(&self) -> Option<&[Self]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Render a scalar as text. Mappings, sequences and null yield `None`.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Str(s) => Some(s.clone()),
            Self::Null | Self::Seq(_) | Self::Map(_) => None,
        }
    }

    /// Short name of the node kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Str(n.to_string()), Self::Int),
            serde_yaml::Value::String(s) => Self::Str(s),
            serde_yaml::Value::Sequence(items) => {
                Self::Seq(items.into_iter().map(Self::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (key_text(k), Self::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

/// Stringify a YAML mapping key. Non-scalar keys fall back to their YAML form.
fn key_text(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
