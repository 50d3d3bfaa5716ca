//! Application layout: how the application window arranges forms and
//! application components.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::container::{Named, NamedContainer};
use super::extension::ExtensionPropertyGroup;
use crate::core::{FormError, FormResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutItemType {
    Group,
    Component,
    Split,
    Tab,
    Space,
}

impl LayoutItemType {
    pub fn parse(value: &str) -> FormResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GROUP" => Ok(LayoutItemType::Group),
            "COMPONENT" => Ok(LayoutItemType::Component),
            "SPLIT" => Ok(LayoutItemType::Split),
            "TAB" => Ok(LayoutItemType::Tab),
            "SPACE" => Ok(LayoutItemType::Space),
            _ => Err(FormError::invalid_value(value, "layout item type", "GROUP, COMPONENT, SPLIT, TAB or SPACE")),
        }
    }

    /// Whether items of this type hold nested layout items.
    pub fn is_container(self) -> bool {
        matches!(self, LayoutItemType::Group | LayoutItemType::Split | LayoutItemType::Tab)
    }
}

impl fmt::Display for LayoutItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayoutItemType::Group => "GROUP",
            LayoutItemType::Component => "COMPONENT",
            LayoutItemType::Split => "SPLIT",
            LayoutItemType::Tab => "TAB",
            LayoutItemType::Space => "SPACE",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub name: String,
    pub item_type: LayoutItemType,
    pub horizontal_span: u32,
    pub vertical_span: u32,
    pub expand_horizontally: bool,
    pub expand_vertically: bool,
    pub hint: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// GROUP
    pub title: Option<String>,
    pub num_cols: u32,
    pub hide_margin: bool,
    /// SPLIT
    pub orientation: Option<String>,
    /// TAB
    pub tab_position: Option<String>,
    /// COMPONENT
    pub renderer_name: Option<String>,
    pub renderer_properties: ExtensionPropertyGroup,
    pub items: NamedContainer<LayoutItem>,
}

impl LayoutItem {
    pub fn new(name: impl Into<String>, item_type: LayoutItemType) -> Self {
        Self {
            name: name.into(),
            item_type,
            horizontal_span: 1,
            vertical_span: 1,
            expand_horizontally: true,
            expand_vertically: true,
            hint: None,
            width: None,
            height: None,
            title: None,
            num_cols: 1,
            hide_margin: false,
            orientation: None,
            tab_position: None,
            renderer_name: None,
            renderer_properties: ExtensionPropertyGroup::new("rendererProperties"),
            items: NamedContainer::new(),
        }
    }
}

impl Named for LayoutItem {
    const KIND: &'static str = "layout item";
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLayout {
    pub title: Option<String>,
    pub num_cols: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub items: NamedContainer<LayoutItem>,
}

impl ApplicationLayout {
    /// Finds an item anywhere in the layout tree.
    pub fn find(&self, name: &str) -> Option<&LayoutItem> {
        fn find<'a>(items: &'a NamedContainer<LayoutItem>, name: &str) -> Option<&'a LayoutItem> {
            items.get(name).or_else(|| items.iter().find_map(|i| find(&i.items, name)))
        }
        find(&self.items, name)
    }
}
