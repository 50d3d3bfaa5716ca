/*!
# Data Binding

Blocks move values between their items and a data object. Instead of
looking fields up by name at run time, each data-object type registers a
[`BindingTable`]: an explicit field name -> (getter, setter) table. A block
definition can be checked against the table once, when the form is loaded.

```rust,ignore
let table = BindingTable::<Customer>::new("Customer")
    .field("ID", |c| FieldValue::Integer(c.id), |c, v| { c.id = v.as_integer()?; Ok(()) })
    .read_only("NAME", |c| FieldValue::Text(c.name.clone()));
table.verify_block(form.require_block("CUSTOMERS")?)?;
```
*/

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{FormError, FormResult, MessageKey};
use crate::model::BlockProperties;

/// A typed value crossing the item / data-object boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> FormResult<Option<&str>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Text(s) => Ok(Some(s)),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn as_integer(&self) -> FormResult<Option<i64>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Integer(i) => Ok(Some(*i)),
            other => Err(other.mismatch("an integer")),
        }
    }

    pub fn as_decimal(&self) -> FormResult<Option<f64>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Decimal(d) => Ok(Some(*d)),
            FieldValue::Integer(i) => Ok(Some(*i as f64)),
            other => Err(other.mismatch("a decimal")),
        }
    }

    pub fn as_boolean(&self) -> FormResult<Option<bool>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Boolean(b) => Ok(Some(*b)),
            other => Err(other.mismatch("a boolean")),
        }
    }

    fn mismatch(&self, expected: &str) -> FormError {
        FormError::invalid_value(&self.to_string(), "field value", expected)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Decimal(d) => write!(f, "{}", d),
            FieldValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

type Getter<T> = Box<dyn Fn(&T) -> FieldValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> FormResult<()> + Send + Sync>;

struct FieldBinding<T> {
    getter: Getter<T>,
    setter: Option<Setter<T>>,
}

/// Field table of one data-object type.
pub struct BindingTable<T> {
    type_name: String,
    fields: IndexMap<String, FieldBinding<T>>,
}

impl<T> BindingTable<T> {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn field<G, S>(mut self, name: impl Into<String>, getter: G, setter: S) -> Self
    where
        G: Fn(&T) -> FieldValue + Send + Sync + 'static,
        S: Fn(&mut T, FieldValue) -> FormResult<()> + Send + Sync + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldBinding {
                getter: Box::new(getter),
                setter: Some(Box::new(setter)),
            },
        );
        self
    }

    pub fn read_only<G>(mut self, name: impl Into<String>, getter: G) -> Self
    where
        G: Fn(&T) -> FieldValue + Send + Sync + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldBinding {
                getter: Box::new(getter),
                setter: None,
            },
        );
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, object: &T, field: &str) -> FormResult<FieldValue> {
        let binding = self.binding(field)?;
        Ok((binding.getter)(object))
    }

    pub fn set(&self, object: &mut T, field: &str, value: FieldValue) -> FormResult<()> {
        let binding = self.binding(field)?;
        match &binding.setter {
            Some(setter) => setter(object, value),
            None => Err(FormError::invalid_value(field, "field assignment", "a writable field")),
        }
    }

    /// Every data item of `block` (service items excepted) has a field.
    pub fn verify_block(&self, block: &BlockProperties) -> FormResult<()> {
        if block.is_control_block {
            return Ok(());
        }
        for item in block.items.iter().filter(|i| !i.block_service_item) {
            if !self.contains(item.field_name()) {
                return Err(FormError::new(MessageKey::UnboundField, [item.field_name(), block.name.as_str()]));
            }
        }
        Ok(())
    }

    fn binding(&self, field: &str) -> FormResult<&FieldBinding<T>> {
        self.fields
            .get(field)
            .ok_or_else(|| FormError::new(MessageKey::UnboundField, [field, self.type_name.as_str()]))
    }
}

impl<T> fmt::Debug for BindingTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockItemProperties;

    #[derive(Debug, Default)]
    struct Customer {
        id: i64,
        name: String,
    }

    fn table() -> BindingTable<Customer> {
        BindingTable::new("Customer")
            .field(
                "ID",
                |c: &Customer| FieldValue::Integer(c.id),
                |c: &mut Customer, v| {
                    c.id = v.as_integer()?.unwrap_or_default();
                    Ok(())
                },
            )
            .read_only("NAME", |c: &Customer| FieldValue::Text(c.name.clone()))
    }

    #[test]
    fn test_get_and_set() {
        let table = table();
        let mut customer = Customer {
            id: 1,
            name: "Acme".into(),
        };
        table.set(&mut customer, "ID", FieldValue::Integer(42)).unwrap();
        assert_eq!(table.get(&customer, "ID").unwrap(), FieldValue::Integer(42));
        assert_eq!(table.get(&customer, "NAME").unwrap(), FieldValue::Text("Acme".into()));

        assert!(table.set(&mut customer, "NAME", FieldValue::Text("x".into())).is_err());
        assert!(table.set(&mut customer, "ID", FieldValue::Boolean(true)).is_err());
        assert_eq!(table.get(&customer, "EMAIL").unwrap_err().key(), MessageKey::UnboundField);
    }

    #[test]
    fn test_verify_block() {
        let table = table();
        let mut block = BlockProperties::new("CUSTOMERS");
        block.items.insert(BlockItemProperties::new("ID", "CUSTOMERS"), "CUSTOMERS").unwrap();
        let mut label = BlockItemProperties::new("CUSTOMER_NAME", "CUSTOMERS");
        label.field_name = Some("NAME".into());
        block.items.insert(label, "CUSTOMERS").unwrap();
        let mut total = BlockItemProperties::new("TOTAL", "CUSTOMERS");
        total.block_service_item = true;
        block.items.insert(total, "CUSTOMERS").unwrap();
        assert!(table.verify_block(&block).is_ok());

        block.items.insert(BlockItemProperties::new("EMAIL", "CUSTOMERS"), "CUSTOMERS").unwrap();
        let err = table.verify_block(&block).unwrap_err();
        assert_eq!(err.to_string(), "data object field EMAIL is not bound for block CUSTOMERS");
    }
}
