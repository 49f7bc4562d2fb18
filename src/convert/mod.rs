//! YAML ⇄ JSON conversion through a format-agnostic value tree.
//!
//! Every conversion runs the same three steps: parse the source text into the
//! format's native tree, [`normalize`] that tree into a [`Node`], then write the
//! [`Node`] with the target format's serializer. Only the parse/write pair
//! differs between directions.
//!
//! The plain entry points ([`yaml_to_json`], [`json_to_yaml`]) are fail-soft:
//! on any failure the returned string is the human-readable error message in
//! place of the converted document. Chat callers post that text back verbatim,
//! so they must not be turned into `Result`s. Use the `try_*` forms when the
//! failure has to be distinguished out-of-band.

use crate::errors::ChatRelayError;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

/// A scalar leaf of the value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

/// Format-agnostic value tree shared by both conversion directions.
///
/// Mapping equality ignores key order; serialization keeps the source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(IndexMap<String, Node>),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("failed to write {format}: {message}")]
    Write {
        format: &'static str,
        message: String,
    },

    #[error("unsupported node kind: {0}")]
    UnsupportedNodeKind(String),

    #[error("duplicate mapping key '{0}'")]
    DuplicateKey(String),
}

impl From<ConvertError> for ChatRelayError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::UnsupportedNodeKind(kind) => Self::UnsupportedNodeKind(kind),
            other => Self::Format(other.to_string()),
        }
    }
}

/// How a native parser node presents itself to [`normalize`].
pub enum NativeKind<N> {
    Scalar(Scalar),
    Sequence(Vec<N>),
    Mapping(Vec<(String, N)>),
    Unsupported(String),
}

/// A node produced by a format's own parser.
pub trait NativeNode: Sized {
    fn classify(self) -> NativeKind<Self>;
}

/// A text format with a parser into a native tree and a writer from [`Node`].
pub trait TextFormat {
    const NAME: &'static str;
    type Native: NativeNode;

    fn parse(text: &str) -> Result<Self::Native, ConvertError>;
    fn write(node: &Node) -> Result<String, ConvertError>;
}

/// Human-authored configuration format.
pub struct Yaml;

/// Machine-interchange format, written indented.
pub struct Json;

impl TextFormat for Yaml {
    const NAME: &'static str = "YAML";
    type Native = serde_yaml_ng::Value;

    fn parse(text: &str) -> Result<Self::Native, ConvertError> {
        serde_yaml_ng::from_str(text).map_err(|e| ConvertError::Parse {
            format: Self::NAME,
            message: e.to_string(),
        })
    }

    fn write(node: &Node) -> Result<String, ConvertError> {
        serde_yaml_ng::to_string(node).map_err(|e| ConvertError::Write {
            format: Self::NAME,
            message: e.to_string(),
        })
    }
}

impl TextFormat for Json {
    const NAME: &'static str = "JSON";
    type Native = serde_json::Value;

    fn parse(text: &str) -> Result<Self::Native, ConvertError> {
        serde_json::from_str(text).map_err(|e| ConvertError::Parse {
            format: Self::NAME,
            message: e.to_string(),
        })
    }

    fn write(node: &Node) -> Result<String, ConvertError> {
        serde_json::to_string_pretty(node).map_err(|e| ConvertError::Write {
            format: Self::NAME,
            message: e.to_string(),
        })
    }
}

impl NativeNode for serde_json::Value {
    fn classify(self) -> NativeKind<Self> {
        use serde_json::Value;
        match self {
            Value::Null => NativeKind::Scalar(Scalar::Null),
            Value::Bool(b) => NativeKind::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    NativeKind::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    NativeKind::Scalar(Scalar::UInt(u))
                } else if let Some(f) = n.as_f64() {
                    NativeKind::Scalar(Scalar::Float(f))
                } else {
                    NativeKind::Unsupported(format!("number {}", n))
                }
            }
            Value::String(s) => NativeKind::Scalar(Scalar::String(s)),
            Value::Array(items) => NativeKind::Sequence(items),
            Value::Object(map) => NativeKind::Mapping(map.into_iter().collect()),
        }
    }
}

impl NativeNode for serde_yaml_ng::Value {
    fn classify(self) -> NativeKind<Self> {
        use serde_yaml_ng::Value;
        match self {
            Value::Null => NativeKind::Scalar(Scalar::Null),
            Value::Bool(b) => NativeKind::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    NativeKind::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    NativeKind::Scalar(Scalar::UInt(u))
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() => NativeKind::Scalar(Scalar::Float(f)),
                        _ => NativeKind::Unsupported(format!("non-finite number {}", n)),
                    }
                }
            }
            Value::String(s) => NativeKind::Scalar(Scalar::String(s)),
            Value::Sequence(items) => NativeKind::Sequence(items),
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    match yaml_key(key) {
                        Ok(key) => entries.push((key, value)),
                        Err(kind) => return NativeKind::Unsupported(kind),
                    }
                }
                NativeKind::Mapping(entries)
            }
            Value::Tagged(tagged) => {
                NativeKind::Unsupported(format!("tagged value {}", tagged.tag))
            }
        }
    }
}

/// YAML allows any node as a mapping key; only scalars have a string form.
fn yaml_key(key: serde_yaml_ng::Value) -> Result<String, String> {
    use serde_yaml_ng::Value;
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err("null mapping key".to_string()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err("non-scalar mapping key".to_string())
        }
    }
}

/// Recursively classify a native tree into a [`Node`].
pub fn normalize<N: NativeNode>(node: N) -> Result<Node, ConvertError> {
    match node.classify() {
        NativeKind::Scalar(scalar) => Ok(Node::Scalar(scalar)),
        NativeKind::Sequence(items) => items
            .into_iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Sequence),
        NativeKind::Mapping(entries) => {
            let mut map = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                let value = normalize(value)?;
                if map.contains_key(&key) {
                    return Err(ConvertError::DuplicateKey(key));
                }
                map.insert(key, value);
            }
            Ok(Node::Mapping(map))
        }
        NativeKind::Unsupported(kind) => Err(ConvertError::UnsupportedNodeKind(kind)),
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::UInt(u) => serializer.serialize_u64(*u),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(map) => serializer.collect_map(map),
        }
    }
}

/// Parse `text` as format `F` and normalize it into a [`Node`].
pub fn parse<F: TextFormat>(text: &str) -> Result<Node, ConvertError> {
    normalize(F::parse(text)?)
}

/// Convert `text` from format `S` to format `T`.
pub fn convert<S: TextFormat, T: TextFormat>(text: &str) -> Result<String, ConvertError> {
    let tree = parse::<S>(text)?;
    T::write(&tree)
}

pub fn try_yaml_to_json(yaml: &str) -> Result<String, ConvertError> {
    convert::<Yaml, Json>(yaml)
}

pub fn try_json_to_yaml(json: &str) -> Result<String, ConvertError> {
    convert::<Json, Yaml>(json)
}

/// Convert YAML to indented JSON. Returns the error message instead on failure.
pub fn yaml_to_json(yaml: &str) -> String {
    fail_soft(try_yaml_to_json(yaml))
}

/// Convert JSON to YAML. Returns the error message instead on failure.
pub fn json_to_yaml(json: &str) -> String {
    fail_soft(try_json_to_yaml(json))
}

fn fail_soft(result: Result<String, ConvertError>) -> String {
    result.unwrap_or_else(|e| {
        debug!("conversion failed: {}", e);
        e.to_string()
    })
}
