/*!
# Application Properties

The single global definition every form load is checked against: declared
renderers per kind, visual attributes, application parameters, menus, the
application layout and the locations of reusable definitions.
*/

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::container::{Named, NamedContainer};
use super::layout::ApplicationLayout;
use super::menu::MenuProperties;
use super::visual::VisualAttributeProperties;
use crate::core::{FormError, FormResult, MessageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RendererKind {
    Form,
    Block,
    Item,
    Lov,
    Menu,
    AppComponent,
}

impl RendererKind {
    pub const ALL: [RendererKind; 6] = [
        RendererKind::Form,
        RendererKind::Block,
        RendererKind::Item,
        RendererKind::Lov,
        RendererKind::Menu,
        RendererKind::AppComponent,
    ];

    /// List element declaring renderers of this kind.
    pub fn list_element(self) -> &'static str {
        match self {
            RendererKind::Form => "formRendererList",
            RendererKind::Block => "blockRendererList",
            RendererKind::Item => "itemRendererList",
            RendererKind::Lov => "lovRendererList",
            RendererKind::Menu => "menuRendererList",
            RendererKind::AppComponent => "appComponentRendererList",
        }
    }

    pub fn from_list_element(tag: &str) -> Option<Self> {
        RendererKind::ALL.into_iter().find(|k| k.list_element() == tag)
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RendererKind::Form => "form",
            RendererKind::Block => "block",
            RendererKind::Item => "item",
            RendererKind::Lov => "lov",
            RendererKind::Menu => "menu",
            RendererKind::AppComponent => "application component",
        };
        write!(f, "{}", s)
    }
}

/// A renderer declared under a symbolic name and bound to a registered
/// implementation name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererDefinition {
    pub name: String,
    pub kind: RendererKind,
    pub implementation: String,
}

impl Named for RendererDefinition {
    const KIND: &'static str = "renderer";
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationParameter {
    pub name: String,
    pub data_type: Option<String>,
    pub default_value: Option<String>,
}

impl Named for ApplicationParameter {
    const KIND: &'static str = "parameter";
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationProperties {
    pub connection_factory: Option<String>,
    pub translator: Option<String>,
    pub reusable_block_location: Option<String>,
    pub reusable_lov_definition_location: Option<String>,
    pub object_group_location: Option<String>,
    pub parameters: NamedContainer<ApplicationParameter>,
    pub visual_attributes: NamedContainer<VisualAttributeProperties>,
    pub renderers: HashMap<RendererKind, NamedContainer<RendererDefinition>>,
    pub menus: NamedContainer<MenuProperties>,
    pub layout: Option<ApplicationLayout>,
}

impl ApplicationProperties {
    pub fn renderer(&self, kind: RendererKind, name: &str) -> Option<&RendererDefinition> {
        self.renderers.get(&kind).and_then(|r| r.get(name))
    }

    pub fn require_renderer(&self, kind: RendererKind, name: &str) -> FormResult<&RendererDefinition> {
        self.renderer(kind, name)
            .ok_or_else(|| FormError::new(MessageKey::RendererNotDefined, [kind.to_string(), name.to_string()]))
    }

    pub fn add_renderer(&mut self, renderer: RendererDefinition) -> FormResult<()> {
        let owner = renderer.kind.list_element();
        self.renderers.entry(renderer.kind).or_default().insert(renderer, owner)?;
        Ok(())
    }

    pub fn visual_attribute(&self, name: &str) -> Option<&VisualAttributeProperties> {
        self.visual_attributes.get(name)
    }

    pub fn require_visual_attribute(&self, name: &str) -> FormResult<&VisualAttributeProperties> {
        self.visual_attribute(name)
            .ok_or_else(|| FormError::new(MessageKey::VisualAttributeNotFound, [name]))
    }

    /// The menu flagged as default, else the first declared one.
    pub fn default_menu(&self) -> Option<&MenuProperties> {
        self.menus
            .iter()
            .find(|m| m.is_default)
            .or_else(|| self.menus.get_index(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderers_are_scoped_by_kind() {
        let mut app = ApplicationProperties::default();
        app.add_renderer(RendererDefinition {
            name: "Text".into(),
            kind: RendererKind::Item,
            implementation: "text.field".into(),
        })
        .unwrap();
        assert!(app.require_renderer(RendererKind::Item, "Text").is_ok());
        let err = app.require_renderer(RendererKind::Block, "Text").unwrap_err();
        assert_eq!(err.to_string(), "no block renderer called Text has been defined");
    }
}
