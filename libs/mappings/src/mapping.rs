use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::rule::{ErasedRule, Rule};
use crate::shape::{FieldInfo, Mappable};
use crate::value::Value;

/// Typed reference to field `F` of record `R`.
///
/// Build with [`field!`](crate::field) so the compiler checks both the
/// identifier and the field type.
pub struct FieldKey<R, F> {
    ident: &'static str,
    _marker: PhantomData<fn(&R) -> &F>,
}

impl<R, F> FieldKey<R, F> {
    /// `get` is only used for type inference.
    pub fn new(ident: &'static str, _get: fn(&R) -> &F) -> Self {
        Self {
            ident,
            _marker: PhantomData,
        }
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }
}

/// `field!(User, state)` builds a [`FieldKey`] for `User::state`.
#[macro_export]
macro_rules! field {
    ($record:ty, $ident:ident) => {
        $crate::FieldKey::<$record, _>::new(::core::stringify!($ident), |r| &r.$ident)
    };
}

/// Registration for one field of a record type.
pub struct FieldEntry {
    ident: &'static str,
    wire_name: String,
    rule: ErasedRule,
}

impl FieldEntry {
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn has_flatten_rule(&self) -> bool {
        self.rule.has_flatten()
    }

    pub fn has_unflatten_rule(&self) -> bool {
        self.rule.has_unflatten()
    }

    pub(crate) fn rule(&self) -> &ErasedRule {
        &self.rule
    }
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry")
            .field("ident", &self.ident)
            .field("wire_name", &self.wire_name)
            .field("rule", &self.rule)
            .finish()
    }
}

/// Customisation of one type: an optional whole-type rule plus per-field
/// entries.
///
/// - Type rule set → it wins over the structural walk, per direction.
/// - Field entry → wire name override and/or per-field rule.
/// - Field without entry → declared wire name, structural recursion.
pub struct Mapping {
    type_name: &'static str,
    declared: &'static [FieldInfo],
    rule: ErasedRule,
    fields: HashMap<&'static str, FieldEntry>,
}

impl Mapping {
    pub(crate) fn new<T: Mappable>() -> Self {
        Self {
            type_name: T::type_name(),
            declared: T::fields(),
            rule: ErasedRule::default(),
            fields: HashMap::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn has_flatten_rule(&self) -> bool {
        self.rule.has_flatten()
    }

    pub fn has_unflatten_rule(&self) -> bool {
        self.rule.has_unflatten()
    }

    /// Entry for a source identifier, if one was registered.
    pub fn field(&self, ident: &str) -> Option<&FieldEntry> {
        self.fields.get(ident)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldEntry> {
        self.fields.values()
    }

    pub(crate) fn rule(&self) -> &ErasedRule {
        &self.rule
    }

    /// Registration override, else the declared wire name.
    pub(crate) fn wire_name<'a>(&'a self, field: &'a FieldInfo) -> &'a str {
        self.fields
            .get(field.ident())
            .map_or(field.wire_name(), FieldEntry::wire_name)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("type_name", &self.type_name)
            .field("rule", &self.rule)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Mutable handle returned by `Context::create_mapping`.
pub struct MappingMut<'a, T> {
    mapping: &'a mut Mapping,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Mappable> MappingMut<'a, T> {
    pub(crate) fn new(mapping: &'a mut Mapping) -> Self {
        Self {
            mapping,
            _marker: PhantomData,
        }
    }

    /// Attach or replace the whole-type rule (both directions).
    pub fn set_rule(&mut self, rule: Rule<T>) -> &mut Self {
        self.mapping.rule = rule.erase();
        self
    }

    /// Set only the flatten direction of the whole-type rule.
    pub fn flatten_with(&mut self, f: impl Fn(&T) -> Value + Send + Sync + 'static) -> &mut Self {
        self.mapping.rule.set_flatten::<T>(f);
        self
    }

    /// Set only the unflatten direction of the whole-type rule.
    pub fn unflatten_with(&mut self, f: impl Fn(&Value) -> T + Send + Sync + 'static) -> &mut Self {
        self.mapping.rule.set_unflatten::<T>(f);
        self
    }

    /// Entry for `key`, created on first access.
    ///
    /// Fails when `T` does not declare the field (including `#[mapping(skip)]`
    /// fields, which the engine never touches).
    pub fn field<F: Mappable>(&mut self, key: FieldKey<T, F>) -> Result<FieldMut<'_, T, F>> {
        let info = self
            .mapping
            .declared
            .iter()
            .find(|f| f.ident() == key.ident())
            .copied()
            .ok_or_else(|| {
                Error::registration(format!(
                    "`{}` has no mappable field `{}`",
                    self.mapping.type_name,
                    key.ident()
                ))
            })?;

        let mut handle = FieldMut {
            mapping: &mut *self.mapping,
            info,
            _marker: PhantomData,
        };
        handle.entry();
        Ok(handle)
    }

    pub fn mapping(&self) -> &Mapping {
        &*self.mapping
    }
}

/// Builder handle for one field entry; every setter is last-write-wins.
pub struct FieldMut<'a, R, F> {
    mapping: &'a mut Mapping,
    info: FieldInfo,
    _marker: PhantomData<fn(&R) -> &F>,
}

impl<R: Mappable, F: Mappable> FieldMut<'_, R, F> {
    /// Rename the field on the wire.
    ///
    /// Rejected when empty or when another field of the same record already
    /// resolves to `name`.
    pub fn wire_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let ident = self.info.ident();
        if name.is_empty() {
            return Err(Error::registration(format!(
                "empty wire name for `{}.{ident}`",
                self.mapping.type_name
            )));
        }

        let declared = self.mapping.declared;
        let clash = declared
            .iter()
            .filter(|f| f.ident() != ident)
            .find(|f| self.mapping.wire_name(f) == name);
        if let Some(other) = clash {
            return Err(Error::registration(format!(
                "wire name `{name}` for `{}.{ident}` is already used by `{}`",
                self.mapping.type_name,
                other.ident()
            )));
        }

        self.entry().wire_name = name;
        Ok(self)
    }

    pub fn flatten_with(mut self, f: impl Fn(&F) -> Value + Send + Sync + 'static) -> Self {
        self.entry().rule.set_flatten::<F>(f);
        self
    }

    pub fn unflatten_with(mut self, f: impl Fn(&Value) -> F + Send + Sync + 'static) -> Self {
        self.entry().rule.set_unflatten::<F>(f);
        self
    }

    /// Merge `rule` into the entry: directions it sets replace the current ones.
    pub fn set_rule(mut self, rule: Rule<F>) -> Self {
        self.entry().rule.merge(rule.erase());
        self
    }

    fn entry(&mut self) -> &mut FieldEntry {
        let info = self.info;
        self.mapping
            .fields
            .entry(info.ident())
            .or_insert_with(|| FieldEntry {
                ident: info.ident(),
                wire_name: info.wire_name().to_owned(),
                rule: ErasedRule::default(),
            })
    }
}
