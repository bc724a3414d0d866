use std::any::Any;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::value::Value;

/// A declared field of a record type, as the derive sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    ident: &'static str,
    wire_name: &'static str,
}

impl FieldInfo {
    pub const fn new(ident: &'static str, wire_name: &'static str) -> Self {
        Self { ident, wire_name }
    }

    /// Source identifier, as written in the struct definition.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// Wire name before any registration override.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name
    }
}

/// A type the engine knows how to walk.
///
/// `Context::flatten` / `Context::unflatten` consult registered rules first
/// and only fall back to the structural methods here when none apply.
/// The defaults fail with `UnsupportedShape`, so a type that is only ever
/// converted through rules can implement this with an empty body:
///
/// ```ignore
/// struct Handle(u64);
/// impl Mappable for Handle {}
/// ```
///
/// Records get their impl from `#[derive(Mappable)]`.
pub trait Mappable: Any + Sized {
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Declared fields in declaration order. Empty for non-records.
    fn fields() -> &'static [FieldInfo] {
        &[]
    }

    fn flatten_structural(&self, _cx: &Context) -> Result<Value> {
        Err(Error::unsupported(Self::type_name()))
    }

    fn unflatten_structural(_node: &Value, _cx: &Context) -> Result<Self> {
        Err(Error::unsupported(Self::type_name()))
    }
}
