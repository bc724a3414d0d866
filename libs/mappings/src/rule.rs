use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

type FlattenFn = Arc<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;
type UnflattenFn = Arc<dyn Fn(&Value) -> Box<dyn Any> + Send + Sync>;

/// Conversion rule for values of type `T`.
///
/// Either direction may be left unset, in which case that direction falls
/// back to structural conversion. Callback output is trusted as-is: the
/// engine does not walk into a node a rule produced.
///
/// ```ignore
/// let rule = Rule::<AccountState>::new()
///     .flatten(|s| Value::from(s.as_str()))
///     .unflatten(|v| AccountState::parse(v.as_str().unwrap_or_default()));
/// ```
pub struct Rule<T> {
    flatten: Option<Box<dyn Fn(&T) -> Value + Send + Sync>>,
    unflatten: Option<Box<dyn Fn(&Value) -> T + Send + Sync>>,
}

impl<T: 'static> Default for Rule<T> {
    fn default() -> Self {
        Self {
            flatten: None,
            unflatten: None,
        }
    }
}

impl<T: 'static> Rule<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flatten(mut self, f: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        self.flatten = Some(Box::new(f));
        self
    }

    pub fn unflatten(mut self, f: impl Fn(&Value) -> T + Send + Sync + 'static) -> Self {
        self.unflatten = Some(Box::new(f));
        self
    }

    pub(crate) fn erase(self) -> ErasedRule {
        let mut erased = ErasedRule::default();
        if let Some(f) = self.flatten {
            erased.set_flatten::<T>(f);
        }
        if let Some(f) = self.unflatten {
            erased.set_unflatten::<T>(f);
        }
        erased
    }
}

/// Type-erased [`Rule`], stored inside a `Mapping`.
///
/// Only the typed registration API builds these, so the downcasts below
/// succeed for every rule reachable from a `Context`.
#[derive(Clone, Default)]
pub(crate) struct ErasedRule {
    flatten: Option<FlattenFn>,
    unflatten: Option<UnflattenFn>,
}

impl ErasedRule {
    pub(crate) fn set_flatten<T: 'static>(&mut self, f: impl Fn(&T) -> Value + Send + Sync + 'static) {
        self.flatten = Some(Arc::new(move |any: &dyn Any| any.downcast_ref::<T>().map(&f)));
    }

    pub(crate) fn set_unflatten<T: 'static>(
        &mut self,
        f: impl Fn(&Value) -> T + Send + Sync + 'static,
    ) {
        self.unflatten = Some(Arc::new(move |node: &Value| Box::new(f(node)) as Box<dyn Any>));
    }

    /// Replace whichever directions `other` sets, keep the rest.
    pub(crate) fn merge(&mut self, other: ErasedRule) {
        if other.flatten.is_some() {
            self.flatten = other.flatten;
        }
        if other.unflatten.is_some() {
            self.unflatten = other.unflatten;
        }
    }

    pub(crate) fn has_flatten(&self) -> bool {
        self.flatten.is_some()
    }

    pub(crate) fn has_unflatten(&self) -> bool {
        self.unflatten.is_some()
    }

    /// `None` when no flatten callback is set.
    pub(crate) fn flatten<T: 'static>(&self, value: &T) -> Option<Result<Value>> {
        let f = self.flatten.as_ref()?;
        Some(f(value as &dyn Any).ok_or_else(foreign_rule::<T>))
    }

    /// `None` when no unflatten callback is set.
    pub(crate) fn unflatten<T: 'static>(&self, node: &Value) -> Option<Result<T>> {
        let f = self.unflatten.as_ref()?;
        Some(
            f(node)
                .downcast::<T>()
                .map(|boxed| *boxed)
                .map_err(|_| foreign_rule::<T>()),
        )
    }
}

impl fmt::Debug for ErasedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("flatten", &self.has_flatten())
            .field("unflatten", &self.has_unflatten())
            .finish()
    }
}

fn foreign_rule<T>() -> Error {
    Error::registration(format!(
        "rule applied to `{}` was registered for another type",
        type_name::<T>()
    ))
}
