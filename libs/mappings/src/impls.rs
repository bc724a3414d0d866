//! Structural forms of std types.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::shape::Mappable;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

impl Mappable for bool {
    fn flatten_structural(&self, _cx: &Context) -> Result<Value> {
        Ok(Value::Bool(*self))
    }

    fn unflatten_structural(node: &Value, _cx: &Context) -> Result<Self> {
        node.as_bool()
            .ok_or_else(|| Error::not_scalar(Self::type_name(), node))
    }
}

impl Mappable for String {
    fn flatten_structural(&self, _cx: &Context) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }

    fn unflatten_structural(node: &Value, _cx: &Context) -> Result<Self> {
        node.as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::not_scalar(Self::type_name(), node))
    }
}

impl Mappable for char {
    fn flatten_structural(&self, _cx: &Context) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn unflatten_structural(node: &Value, _cx: &Context) -> Result<Self> {
        let mut chars = node.as_str().unwrap_or_default().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::not_scalar(Self::type_name(), node)),
        }
    }
}

impl Mappable for () {
    fn flatten_structural(&self, _cx: &Context) -> Result<Value> {
        Ok(Value::Null)
    }

    fn unflatten_structural(node: &Value, _cx: &Context) -> Result<Self> {
        if node.is_null() {
            Ok(())
        } else {
            Err(Error::not_scalar(Self::type_name(), node))
        }
    }
}

/// Integers go through `i128` so every narrowing is range-checked.
/// Floats are never truncated into integers.
macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl Mappable for $ty {
            fn flatten_structural(&self, _cx: &Context) -> Result<Value> {
                let wide = i128::from(*self);
                Ok(match i64::try_from(wide) {
                    Ok(v) => Value::Int(v),
                    Err(_) => Value::UInt(wide as u64),
                })
            }

            fn unflatten_structural(node: &Value, _cx: &Context) -> Result<Self> {
                let wide = match node {
                    Value::Int(v) => i128::from(*v),
                    Value::UInt(v) => i128::from(*v),
                    _ => return Err(Error::not_scalar(Self::type_name(), node)),
                };
                <$ty>::try_from(wide).map_err(|_| Error::not_scalar(Self::type_name(), node))
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_pointer_sized {
    ($ty:ty => $via:ty) => {
        impl Mappable for $ty {
            fn flatten_structural(&self, cx: &Context) -> Result<Value> {
                <$via>::try_from(*self)
                    .map_err(|_| Error::unsupported(Self::type_name()))?
                    .flatten_structural(cx)
            }

            fn unflatten_structural(node: &Value, cx: &Context) -> Result<Self> {
                let wide = <$via>::unflatten_structural(node, cx)?;
                <$ty>::try_from(wide).map_err(|_| Error::not_scalar(Self::type_name(), node))
            }
        }
    };
}

impl_pointer_sized!(usize => u64);
impl_pointer_sized!(isize => i64);

impl Mappable for f64 {
    fn flatten_structural(&self, _cx: &Context) -> Result<Value> {
        if self.is_finite() {
            Ok(Value::Float(*self))
        } else {
            Err(Error::unsupported(&format!("non-finite {self}")))
        }
    }

    fn unflatten_structural(node: &Value, _cx: &Context) -> Result<Self> {
        node.as_f64()
            .ok_or_else(|| Error::not_scalar(Self::type_name(), node))
    }
}

impl Mappable for f32 {
    fn flatten_structural(&self, cx: &Context) -> Result<Value> {
        f64::from(*self).flatten_structural(cx)
    }

    fn unflatten_structural(node: &Value, _cx: &Context) -> Result<Self> {
        let wide = node
            .as_f64()
            .ok_or_else(|| Error::not_scalar(Self::type_name(), node))?;
        // Out-of-range values would saturate to infinity.
        let narrow = wide as f32;
        if narrow.is_finite() {
            Ok(narrow)
        } else {
            Err(Error::coercion(Self::type_name(), node))
        }
    }
}

// ---------------------------------------------------------------------------
// Wrappers
// ---------------------------------------------------------------------------

/// `None` is `Null`. Nested options collapse: `Some(None)` also flattens to
/// `Null` and comes back as `None`.
impl<T: Mappable> Mappable for Option<T> {
    fn flatten_structural(&self, cx: &Context) -> Result<Value> {
        match self {
            Some(inner) => cx.flatten(inner),
            None => Ok(Value::Null),
        }
    }

    fn unflatten_structural(node: &Value, cx: &Context) -> Result<Self> {
        if node.is_null() {
            return Ok(None);
        }
        cx.unflatten(node).map(Some)
    }
}

impl<T: Mappable> Mappable for Box<T> {
    fn flatten_structural(&self, cx: &Context) -> Result<Value> {
        cx.flatten(self.as_ref())
    }

    fn unflatten_structural(node: &Value, cx: &Context) -> Result<Self> {
        cx.unflatten(node).map(Box::new)
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

impl<T: Mappable> Mappable for Vec<T> {
    fn flatten_structural(&self, cx: &Context) -> Result<Value> {
        cx.flatten_sequence(self)
    }

    fn unflatten_structural(node: &Value, cx: &Context) -> Result<Self> {
        cx.unflatten_sequence(node)
    }
}

impl<V: Mappable> Mappable for BTreeMap<String, V> {
    fn flatten_structural(&self, cx: &Context) -> Result<Value> {
        cx.flatten_entries(self)
    }

    fn unflatten_structural(node: &Value, cx: &Context) -> Result<Self> {
        cx.unflatten_entries(node)
    }
}

impl<V, S> Mappable for HashMap<String, V, S>
where
    V: Mappable,
    S: BuildHasher + Default + 'static,
{
    fn flatten_structural(&self, cx: &Context) -> Result<Value> {
        cx.flatten_entries(self)
    }

    fn unflatten_structural(node: &Value, cx: &Context) -> Result<Self> {
        cx.unflatten_entries(node)
    }
}
