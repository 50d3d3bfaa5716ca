/*!
# Extension Properties

Renderer-defined, schema-less property trees. A group holds named
properties, nested groups and named lists; a list holds rows, each row a bag
of named properties. The loader never interprets these beyond checking the
declared value kind.
*/

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::container::{Named, NamedContainer};
use super::visual::Color;
use crate::core::{FormError, FormResult};

/// Declared kind of an extension property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    #[default]
    String,
    Boolean,
    Integer,
    Float,
    Color,
    ComponentName,
    LovDefinition,
    /// `lovDefinitionName.itemName`
    LovDefinitionItem,
    VisualAttribute,
    BlockItem,
    ActionCommand,
}

impl PropertyKind {
    pub fn parse(value: &str) -> FormResult<Self> {
        let kind = match value.trim().to_ascii_uppercase().as_str() {
            "" | "STRING" => PropertyKind::String,
            "BOOLEAN" => PropertyKind::Boolean,
            "INTEGER" => PropertyKind::Integer,
            "FLOAT" => PropertyKind::Float,
            "COLOR" => PropertyKind::Color,
            "COMPONENT_NAME" => PropertyKind::ComponentName,
            "LOV_DEFINITION" => PropertyKind::LovDefinition,
            "LOV_DEFINITION_ITEM" => PropertyKind::LovDefinitionItem,
            "VISUAL_ATTRIBUTE" => PropertyKind::VisualAttribute,
            "BLOCK_ITEM" => PropertyKind::BlockItem,
            "ACTION_COMMAND" => PropertyKind::ActionCommand,
            _ => return Err(FormError::invalid_value(value, "property type", "a known property type")),
        };
        Ok(kind)
    }

    /// Whether values of this kind name a LOV definition.
    pub fn is_lov_reference(self) -> bool {
        matches!(self, PropertyKind::LovDefinition | PropertyKind::LovDefinitionItem)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyKind::String => "STRING",
            PropertyKind::Boolean => "BOOLEAN",
            PropertyKind::Integer => "INTEGER",
            PropertyKind::Float => "FLOAT",
            PropertyKind::Color => "COLOR",
            PropertyKind::ComponentName => "COMPONENT_NAME",
            PropertyKind::LovDefinition => "LOV_DEFINITION",
            PropertyKind::LovDefinitionItem => "LOV_DEFINITION_ITEM",
            PropertyKind::VisualAttribute => "VISUAL_ATTRIBUTE",
            PropertyKind::BlockItem => "BLOCK_ITEM",
            PropertyKind::ActionCommand => "ACTION_COMMAND",
        };
        write!(f, "{}", s)
    }
}

/// A single named property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionProperty {
    pub name: String,
    pub kind: PropertyKind,
    pub multilingual: bool,
    pub value: Option<String>,
}

impl ExtensionProperty {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            multilingual: false,
            value: None,
        }
    }

    /// Checks the textual value against the declared kind.
    pub fn validate(&self) -> FormResult<()> {
        let Some(value) = self.value.as_deref() else {
            return Ok(());
        };
        let what = format!("property {}", self.name);
        match self.kind {
            PropertyKind::Boolean => {
                parse_bool(value).ok_or_else(|| FormError::invalid_value(value, &what, "true or false"))?;
            }
            PropertyKind::Integer => {
                value
                    .parse::<i64>()
                    .map_err(|_| FormError::invalid_value(value, &what, "an integer"))?;
            }
            PropertyKind::Float => {
                value
                    .parse::<f64>()
                    .map_err(|_| FormError::invalid_value(value, &what, "a number"))?;
            }
            PropertyKind::Color => {
                Color::parse(value).map_err(|_| FormError::invalid_value(value, &what, "a color"))?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_deref().and_then(parse_bool)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_deref().and_then(|v| v.parse().ok())
    }

    /// For LOV reference kinds: the LOV definition name part of the value.
    pub fn lov_definition_name(&self) -> Option<&str> {
        let value = self.value.as_deref()?;
        match self.kind {
            PropertyKind::LovDefinition => Some(value),
            PropertyKind::LovDefinitionItem => Some(split_lov_item(value).0),
            _ => None,
        }
    }

    /// Replaces the LOV definition name part of a LOV reference value.
    pub fn set_lov_definition_name(&mut self, lov_name: &str) {
        let Some(value) = self.value.as_deref() else {
            return;
        };
        let rewritten = match self.kind {
            PropertyKind::LovDefinition => lov_name.to_string(),
            PropertyKind::LovDefinitionItem => match split_lov_item(value).1 {
                Some(item) => format!("{}.{}", lov_name, item),
                None => lov_name.to_string(),
            },
            _ => return,
        };
        self.value = Some(rewritten);
    }
}

impl Named for ExtensionProperty {
    const KIND: &'static str = "property";
    fn name(&self) -> &str {
        &self.name
    }
}

/// Splits `lov.item` at the last dot. Scoped LOV names may contain dots
/// themselves, so the item is always the trailing segment.
fn split_lov_item(value: &str) -> (&str, Option<&str>) {
    match value.rfind('.') {
        Some(idx) if !value[idx + 1..].contains(']') => (&value[..idx], Some(&value[idx + 1..])),
        _ => (value, None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "TRUE" | "True" => Some(true),
        "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// One row of an [`ExtensionPropertyList`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionPropertyListEntry {
    pub properties: IndexMap<String, ExtensionProperty>,
}

impl ExtensionPropertyListEntry {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|p| p.value.as_deref())
    }
}

/// Named list of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionPropertyList {
    pub name: String,
    pub entries: Vec<ExtensionPropertyListEntry>,
}

impl Named for ExtensionPropertyList {
    const KIND: &'static str = "property list";
    fn name(&self) -> &str {
        &self.name
    }
}

/// Named group of properties, sub-groups and lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionPropertyGroup {
    pub name: String,
    pub properties: NamedContainer<ExtensionProperty>,
    pub groups: NamedContainer<ExtensionPropertyGroup>,
    pub lists: NamedContainer<ExtensionPropertyList>,
}

impl Named for ExtensionPropertyGroup {
    const KIND: &'static str = "property group";
    fn name(&self) -> &str {
        &self.name
    }
}

impl ExtensionPropertyGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.groups.is_empty() && self.lists.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|p| p.value.as_deref())
    }

    pub fn group(&self, name: &str) -> Option<&ExtensionPropertyGroup> {
        self.groups.get(name)
    }

    pub fn list(&self, name: &str) -> Option<&ExtensionPropertyList> {
        self.lists.get(name)
    }

    /// Looks up a property by a dotted path of group names, e.g. `layout.gap`.
    pub fn lookup(&self, path: &str) -> Option<&ExtensionProperty> {
        let mut group = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                return group.properties.get(segment);
            }
            group = group.groups.get(segment)?;
        }
        None
    }

    /// Visits every property in the tree (groups and list rows) mutably.
    pub fn for_each_property_mut(&mut self, f: &mut dyn FnMut(&mut ExtensionProperty)) {
        for property in self.properties.iter_mut() {
            f(property);
        }
        for group in self.groups.iter_mut() {
            group.for_each_property_mut(f);
        }
        for list in self.lists.iter_mut() {
            for entry in &mut list.entries {
                for property in entry.properties.values_mut() {
                    f(property);
                }
            }
        }
    }

    /// Visits every property in the tree.
    pub fn for_each_property(&self, f: &mut dyn FnMut(&ExtensionProperty)) {
        for property in self.properties.iter() {
            f(property);
        }
        for group in self.groups.iter() {
            group.for_each_property(f);
        }
        for list in self.lists.iter() {
            for entry in &list.entries {
                for property in entry.properties.values() {
                    f(property);
                }
            }
        }
    }
}
