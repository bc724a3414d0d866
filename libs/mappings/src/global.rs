//! Process-wide default [`Context`].
//!
//! Created on first use. Register everything through [`configure`] during
//! start-up, before conversion traffic begins; afterwards the free functions
//! here only take the read lock.

use std::sync::{LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::Context;
use crate::error::Result;
use crate::shape::Mappable;
use crate::value::Value;

static DEFAULT: LazyLock<RwLock<Context>> = LazyLock::new(|| RwLock::new(Context::new()));

fn read() -> RwLockReadGuard<'static, Context> {
    match DEFAULT.read() {
        Ok(g) => g,
        Err(poisoned) => {
            tracing::warn!("default context read lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

fn write() -> RwLockWriteGuard<'static, Context> {
    match DEFAULT.write() {
        Ok(g) => g,
        Err(poisoned) => {
            tracing::warn!("default context write lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

/// Mutate the default context (register, replace or remove mappings).
pub fn configure<R>(f: impl FnOnce(&mut Context) -> R) -> R {
    f(&mut write())
}

/// Read the default context.
pub fn with_default<R>(f: impl FnOnce(&Context) -> R) -> R {
    f(&read())
}

pub fn flatten<T: Mappable>(value: &T) -> Result<Value> {
    read().flatten(value)
}

pub fn unflatten<T: Mappable>(node: &Value) -> Result<T> {
    read().unflatten(node)
}

pub fn marshal<T: Mappable>(value: &T) -> Result<Vec<u8>> {
    read().marshal(value)
}

pub fn unmarshal<T: Mappable>(bytes: &[u8]) -> Result<T> {
    read().unmarshal(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The default context is shared by every test in this binary, so each
    // test registers its own type.
    #[derive(Debug, Default, PartialEq)]
    struct Flag(bool);

    impl Mappable for Flag {}

    #[test]
    fn configured_rules_apply_to_free_functions() {
        configure(|cx| {
            cx.create_mapping::<Flag>()
                .flatten_with(|f| Value::from(if f.0 { "on" } else { "off" }))
                .unflatten_with(|node| Flag(node.as_str() == Some("on")));
        });

        assert_eq!(marshal(&Flag(true)).unwrap(), br#""on""#);
        assert_eq!(unmarshal::<Flag>(br#""off""#).unwrap(), Flag(false));
        assert!(with_default(|cx| cx.contains::<Flag>()));
    }
}
