use std::fmt;

use crate::value::Value;

/// Error kind for conversion and registration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Neither record, sequence nor scalar, and no rule applies.
    UnsupportedShape,
    /// A scalar node does not fit the target primitive.
    ScalarCoercion,
    /// Node shape and target shape disagree.
    ShapeMismatch,
    /// The wire codec rejected the bytes or the tree.
    Codec,
    /// Rejected at `field()` / `wire_name()` time.
    Registration,
}

/// One step from the root of a value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// Location of a failure inside a value tree, rendered as `$.cards[2].id`.
///
/// Segments are collected while the error unwinds, so they are stored
/// leaf-first and reversed on the way out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments in root-to-leaf order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter().rev()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in self.segments() {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Conversion error, returned by every flatten, unflatten and codec call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?} at {path}: {message}")]
pub struct Error {
    kind: ErrorKind,
    path: Path,
    message: String,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            path: Path::default(),
            message: msg.into(),
        }
    }

    pub fn unsupported(type_name: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedShape,
            format!("`{type_name}` has no structural form and no registered rule"),
        )
    }

    pub fn coercion(type_name: &str, node: &Value) -> Self {
        Self::new(
            ErrorKind::ScalarCoercion,
            format!("cannot coerce {} {node:?} into `{type_name}`", node.kind()),
        )
    }

    /// A scalar target could not be built from `node`: `ShapeMismatch` when
    /// the node is a sequence or record, `ScalarCoercion` otherwise.
    pub fn not_scalar(type_name: &str, node: &Value) -> Self {
        if node.is_scalar() {
            Self::coercion(type_name, node)
        } else {
            Self::mismatch(&format!("scalar `{type_name}`"), node)
        }
    }

    pub fn mismatch(expected: &str, node: &Value) -> Self {
        Self::new(
            ErrorKind::ShapeMismatch,
            format!("expected {expected}, found {}", node.kind()),
        )
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Codec, msg)
    }

    pub fn registration(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Registration, msg)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Record that the failure happened below field `name`.
    pub fn at_field(mut self, name: impl Into<String>) -> Self {
        self.path.0.push(Segment::Field(name.into()));
        self
    }

    /// Record that the failure happened below sequence element `index`.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.0.push(Segment::Index(index));
        self
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::codec(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_renders_root_first() {
        let err = Error::mismatch("record", &Value::Int(1))
            .at_field("id")
            .at_index(2)
            .at_field("cards");
        assert_eq!(err.path().to_string(), "$.cards[2].id");
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn display_carries_kind_path_and_message() {
        let err = Error::coercion("u8", &Value::Int(300)).at_field("wiplimit");
        let msg = err.to_string();
        assert!(msg.contains("ScalarCoercion"));
        assert!(msg.contains("$.wiplimit"));
        assert!(msg.contains("u8"));
    }

    #[test]
    fn scalar_failures_split_by_node_shape() {
        assert_eq!(
            Error::not_scalar("u8", &Value::from("x")).kind(),
            ErrorKind::ScalarCoercion
        );
        let err = Error::not_scalar("u8", &Value::Sequence(vec![]));
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert!(err.message().contains("scalar `u8`"));
    }

    #[test]
    fn root_path_is_dollar() {
        let err = Error::codec("eof");
        assert!(err.path().is_root());
        assert_eq!(err.path().to_string(), "$");
    }

    #[test]
    fn json_errors_are_codec_failures() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(json_err).kind(), ErrorKind::Codec);
    }
}
