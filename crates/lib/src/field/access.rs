//! Value access: reading, writing and emptiness checks for every field kind.

use tracing::{trace, warn};

use super::{FieldError, FieldId, FieldKind, FieldTree};
use crate::{Result, Value, value::Map};

impl FieldTree {
    /// Gets the value of a field.
    ///
    /// Objects return a map of their non-unset children, or `None` when no
    /// child has a value. Lazy links return their child's value while active
    /// and their cached value otherwise.
    pub fn get_value(&self, id: FieldId) -> Result<Option<Value>> {
        match &self.node(id)?.kind {
            FieldKind::Input(input) => Ok(input.value().cloned()),
            FieldKind::Object(object) => {
                let mut map = Map::new();
                for child in object.children() {
                    if let Some(value) = self.get_value(*child)? {
                        map.insert(self.node(*child)?.key.clone(), value);
                    }
                }
                Ok((!map.is_empty()).then_some(Value::Map(map)))
            }
            FieldKind::LazyLink(link) => match link.child() {
                Some(child) => self.get_value(child),
                None => Ok(link.cached_value().cloned()),
            },
        }
    }

    /// Sets the value of a field. `Value::Null` clears it.
    ///
    /// Objects take a map and distribute it over their children by key:
    /// children missing from the map are cleared and keys without a matching
    /// child are dropped. A lazy link without a child buffers the value; it
    /// never creates its child as a side effect.
    pub fn set_value(&mut self, id: FieldId, value: Value) -> Result<()> {
        self.on_set_value(id)?;
        match self.kind_mut(id)? {
            FieldKind::Input(input) => {
                input.set(value);
                Ok(())
            }
            FieldKind::Object(object) => {
                let children = object.children().to_vec();
                self.set_object_value(id, &children, value)
            }
            FieldKind::LazyLink(link) => match link.child() {
                Some(child) => self.set_value(child, value),
                None => {
                    link.set_cached_value((!value.is_null()).then_some(value));
                    Ok(())
                }
            },
        }
    }

    /// Clears the value of a field
    pub fn clear_value(&mut self, id: FieldId) -> Result<()> {
        self.set_value(id, Value::Null)
    }

    fn set_object_value(&mut self, id: FieldId, children: &[FieldId], value: Value) -> Result<()> {
        let mut map = match value {
            Value::Null => Map::new(),
            Value::Map(map) => map,
            other => {
                return Err(FieldError::TypeMismatch {
                    field: self.describe(id),
                    expected: "map",
                    actual: other.type_name(),
                }
                .into());
            }
        };

        for child in children {
            let key = self.node(*child)?.key.clone();
            let value = map.remove(&key).unwrap_or(Value::Null);
            self.set_value(*child, value)?;
        }

        if !map.is_empty() {
            warn!(
                field = %self.describe(id),
                keys = ?map.keys().collect::<Vec<_>>(),
                "Ignored values without a matching child field"
            );
        }
        Ok(())
    }

    /// Runs before every assignment to a field.
    fn on_set_value(&mut self, id: FieldId) -> Result<()> {
        self.node_mut(id)?.touched = true;
        trace!(field = %id, "Setting field value");
        Ok(())
    }

    /// Returns true if the field holds no meaningful value.
    ///
    /// Inputs are empty when unset or blank, objects when every child is
    /// empty. A lazy link without a child is empty when its cached value is
    /// unset or falsy.
    pub fn is_empty(&self, id: FieldId) -> Result<bool> {
        match &self.node(id)?.kind {
            FieldKind::Input(input) => Ok(input.is_empty()),
            FieldKind::Object(object) => {
                for child in object.children() {
                    if !self.is_empty(*child)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            FieldKind::LazyLink(link) => match link.child() {
                Some(child) => self.is_empty(child),
                None => Ok(link.cached_value().is_none_or(Value::is_falsy)),
            },
        }
    }
}
