use crate::context::Context;
use crate::error::{Error, Result};
use crate::mapping::{FieldEntry, Mapping};
use crate::shape::{FieldInfo, Mappable};
use crate::value::{Record, Value};

impl Context {
    /// Build a `T` from `node`, driven by `T` rather than by the node's shape.
    ///
    /// A registered unflatten rule for `T` receives the raw node and its
    /// result is returned as-is; otherwise `T` is rebuilt structurally.
    pub fn unflatten<T: Mappable>(&self, node: &Value) -> Result<T> {
        if let Some(result) = self
            .get_mapping::<T>()
            .and_then(|m| m.rule().unflatten::<T>(node))
        {
            return result;
        }
        T::unflatten_structural(node, self)
    }

    /// Open `node` as the record form of `R`. Used by `#[derive(Mappable)]`.
    #[doc(hidden)]
    pub fn record_reader<'n, R: Mappable>(&self, node: &'n Value) -> Result<RecordReader<'_, 'n>> {
        let record = node
            .as_record()
            .ok_or_else(|| Error::mismatch(&format!("record `{}`", R::type_name()), node))?;
        Ok(RecordReader {
            cx: self,
            mapping: self.get_mapping::<R>(),
            record,
        })
    }

    #[doc(hidden)]
    pub fn unflatten_sequence<T: Mappable>(&self, node: &Value) -> Result<Vec<T>> {
        let items = node
            .as_sequence()
            .ok_or_else(|| Error::mismatch("sequence", node))?;

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.unflatten(item) {
                Ok(value) => out.push(value),
                Err(e) => self.tolerate(e.at_index(index), "dropped element that failed to unflatten")?,
            }
        }
        Ok(out)
    }

    #[doc(hidden)]
    pub fn unflatten_entries<V, C>(&self, node: &Value) -> Result<C>
    where
        V: Mappable,
        C: FromIterator<(String, V)>,
    {
        let record = node
            .as_record()
            .ok_or_else(|| Error::mismatch("record", node))?;

        let mut out = Vec::with_capacity(record.len());
        for (key, item) in record {
            match self.unflatten(item) {
                Ok(value) => out.push((key.clone(), value)),
                Err(e) => self.tolerate(e.at_field(key.as_str()), "dropped entry that failed to unflatten")?,
            }
        }
        Ok(out.into_iter().collect())
    }
}

/// Reads the fields of one record node into a zero-valued target.
#[doc(hidden)]
pub struct RecordReader<'cx, 'n> {
    cx: &'cx Context,
    mapping: Option<&'cx Mapping>,
    record: &'n Record,
}

impl RecordReader<'_, '_> {
    /// Assign the field found under its resolved wire name into `slot`.
    ///
    /// A missing key leaves `slot` at its zero value. A present key that
    /// does not convert is always an error, strict or not.
    pub fn field<F: Mappable>(&self, info: &FieldInfo, slot: &mut F) -> Result<()> {
        let wire = self.mapping.map_or(info.wire_name(), |m| m.wire_name(info));
        let Some(node) = self.record.get(wire) else {
            return Ok(());
        };

        let rule = self
            .mapping
            .and_then(|m| m.field(info.ident()))
            .map(FieldEntry::rule);

        let value = match rule.and_then(|r| r.unflatten::<F>(node)) {
            Some(result) => result,
            None => self.cx.unflatten::<F>(node),
        };
        *slot = value.map_err(|e| e.at_field(wire))?;
        Ok(())
    }
}
