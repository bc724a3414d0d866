use crate::context::Context;
use crate::error::{Error, Result};
use crate::mapping::{FieldEntry, Mapping};
use crate::shape::{FieldInfo, Mappable};
use crate::value::{Record, Value};

impl Context {
    /// Convert `value` into a fresh value tree.
    ///
    /// A registered flatten rule for `T` wins and its output is used as-is;
    /// otherwise `T` is walked structurally, consulting this context again
    /// at every nested value.
    pub fn flatten<T: Mappable>(&self, value: &T) -> Result<Value> {
        if let Some(result) = self
            .get_mapping::<T>()
            .and_then(|m| m.rule().flatten(value))
        {
            return result;
        }
        value.flatten_structural(self)
    }

    /// Start building the record node for a `R` value. Used by
    /// `#[derive(Mappable)]`.
    #[doc(hidden)]
    pub fn record_writer<R: Mappable>(&self) -> RecordWriter<'_> {
        RecordWriter {
            cx: self,
            mapping: self.get_mapping::<R>(),
            record: Record::new(),
        }
    }

    #[doc(hidden)]
    pub fn flatten_sequence<'v, T>(&self, items: impl IntoIterator<Item = &'v T>) -> Result<Value>
    where
        T: Mappable + 'v,
    {
        let mut out = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match self.flatten(item) {
                Ok(node) => out.push(node),
                Err(e) => self.tolerate(e.at_index(index), "dropped element that failed to flatten")?,
            }
        }
        Ok(Value::Sequence(out))
    }

    #[doc(hidden)]
    pub fn flatten_entries<'v, V>(
        &self,
        entries: impl IntoIterator<Item = (&'v String, &'v V)>,
    ) -> Result<Value>
    where
        V: Mappable + 'v,
    {
        let mut out = Record::new();
        for (key, item) in entries {
            match self.flatten(item) {
                Ok(node) => {
                    out.insert(key.clone(), node);
                }
                Err(e) => self.tolerate(e.at_field(key.as_str()), "dropped entry that failed to flatten")?,
            }
        }
        Ok(Value::Record(out))
    }

    /// Permissive mode swallows `err` (logged at debug), strict mode returns it.
    pub(crate) fn tolerate(&self, err: Error, what: &'static str) -> Result<()> {
        if self.options().strict {
            return Err(err);
        }
        tracing::debug!(path = %err.path(), error = %err.message(), "{what}");
        Ok(())
    }
}

/// Accumulates the fields of one record node.
#[doc(hidden)]
pub struct RecordWriter<'cx> {
    cx: &'cx Context,
    mapping: Option<&'cx Mapping>,
    record: Record,
}

impl RecordWriter<'_> {
    /// Flatten one field under its resolved wire name.
    pub fn field<F: Mappable>(&mut self, info: &FieldInfo, value: &F) -> Result<()> {
        let wire = self.mapping.map_or(info.wire_name(), |m| m.wire_name(info));
        let rule = self
            .mapping
            .and_then(|m| m.field(info.ident()))
            .map(FieldEntry::rule);

        let flattened = match rule.and_then(|r| r.flatten(value)) {
            Some(result) => result,
            None => self.cx.flatten(value),
        };

        match flattened {
            Ok(node) => {
                self.record.insert(wire.to_owned(), node);
                Ok(())
            }
            Err(e) => self.cx.tolerate(e.at_field(wire), "skipped field that failed to flatten"),
        }
    }

    pub fn finish(self) -> Value {
        Value::Record(self.record)
    }
}
