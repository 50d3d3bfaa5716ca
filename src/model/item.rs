/*!
# Item Properties

A block item is the shared identity of a value in a block (data type,
defaults, LOV mapping). Each of the four screens (main, query, insert,
update) lays block items out in nested item groups through screen items
that reference the block item by name.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

use super::container::{Named, NamedContainer};
use super::extension::ExtensionPropertyGroup;

/// Shared identity of an item within a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockItemProperties {
    pub name: String,
    pub block_name: String,
    pub data_type: Option<String>,
    /// Data-object field the item binds to; defaults to the item name.
    pub field_name: Option<String>,
    /// Service items are maintained by the block service, not bound.
    pub block_service_item: bool,
    pub default_query_value: Option<String>,
    pub default_insert_value: Option<String>,
    pub lov_mapping_name: Option<String>,
    pub visual_attribute_name: Option<String>,
    pub action_command: Option<String>,
    pub renderer_name: Option<String>,
    pub renderer_properties: ExtensionPropertyGroup,
}

impl BlockItemProperties {
    pub fn new(name: impl Into<String>, block_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            block_name: block_name.into(),
            ..Default::default()
        }
    }

    pub fn field_name(&self) -> &str {
        self.field_name.as_deref().unwrap_or(&self.name)
    }
}

impl Named for BlockItemProperties {
    const KIND: &'static str = "item";
    fn name(&self) -> &str {
        &self.name
    }
}

/// The four screens a block lays its items out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenType {
    Main,
    Query,
    Insert,
    Update,
}

impl ScreenType {
    pub const ALL: [ScreenType; 4] = [ScreenType::Main, ScreenType::Query, ScreenType::Insert, ScreenType::Update];

    /// Element that opens the screen inside `<block>`.
    pub fn element(self) -> &'static str {
        match self {
            ScreenType::Main => "mainScreen",
            ScreenType::Query => "queryScreen",
            ScreenType::Insert => "insertScreen",
            ScreenType::Update => "updateScreen",
        }
    }

    pub fn from_element(tag: &str) -> Option<Self> {
        ScreenType::ALL.into_iter().find(|s| s.element() == tag)
    }
}

impl fmt::Display for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScreenType::Main => "main",
            ScreenType::Query => "query",
            ScreenType::Insert => "insert",
            ScreenType::Update => "update",
        };
        write!(f, "{}", s)
    }
}

/// Item as it appears on one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenItemProperties {
    pub screen: ScreenType,
    /// Unique within the owning group: the referenced item name, or a
    /// generated name for spacers.
    pub name: String,
    pub referenced_item_name: Option<String>,
    pub is_spacer: bool,
    pub label: Option<String>,
    pub hint: Option<String>,
    pub visible: bool,
    pub editable: bool,
    pub mandatory: bool,
    pub validate_from_lov: bool,
    pub action_command: Option<String>,
    pub visual_attribute_name: Option<String>,
    pub renderer_properties: ExtensionPropertyGroup,
}

impl ScreenItemProperties {
    /// Builds the screen-specific variant with that screen's defaults.
    /// Query screen items are always editable and validate against their
    /// LOV; update screen items validate as well; main screen items do not.
    pub fn new(screen: ScreenType) -> Self {
        Self {
            screen,
            name: String::new(),
            referenced_item_name: None,
            is_spacer: false,
            label: None,
            hint: None,
            visible: true,
            editable: true,
            mandatory: false,
            validate_from_lov: !matches!(screen, ScreenType::Main),
            action_command: None,
            visual_attribute_name: None,
            renderer_properties: ExtensionPropertyGroup::new("rendererProperties"),
        }
    }
}

impl Named for ScreenItemProperties {
    const KIND: &'static str = "screen item";
    fn name(&self) -> &str {
        &self.name
    }
}

/// Recursive layout group on a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroupProperties {
    pub screen: ScreenType,
    pub name: String,
    pub num_cols: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub horizontal_span: u32,
    pub vertical_span: u32,
    pub expand_horizontally: bool,
    pub expand_vertically: bool,
    pub display_group_frame: bool,
    pub frame_title: Option<String>,
    pub separator: bool,
    pub separator_orientation: Option<String>,
    pub separator_line_style: Option<String>,
    pub horizontal_alignment: Option<String>,
    pub vertical_alignment: Option<String>,
    pub renderer_properties: ExtensionPropertyGroup,
    pub items: NamedContainer<ScreenItemProperties>,
    pub groups: NamedContainer<ItemGroupProperties>,
}

impl ItemGroupProperties {
    pub fn new(screen: ScreenType, name: impl Into<String>) -> Self {
        Self {
            screen,
            name: name.into(),
            num_cols: 1,
            width: None,
            height: None,
            horizontal_span: 1,
            vertical_span: 1,
            expand_horizontally: true,
            expand_vertically: false,
            display_group_frame: false,
            frame_title: None,
            separator: false,
            separator_orientation: None,
            separator_line_style: None,
            horizontal_alignment: None,
            vertical_alignment: None,
            renderer_properties: ExtensionPropertyGroup::new("rendererProperties"),
            items: NamedContainer::new(),
            groups: NamedContainer::new(),
        }
    }

    /// Screen items of this group and all nested groups, depth first.
    pub fn all_items(&self) -> Vec<&ScreenItemProperties> {
        let mut out: Vec<&ScreenItemProperties> = self.items.iter().collect();
        for group in self.groups.iter() {
            out.extend(group.all_items());
        }
        out
    }

    pub fn for_each_group_mut(&mut self, f: &mut dyn FnMut(&mut ItemGroupProperties)) {
        f(self);
        for group in self.groups.iter_mut() {
            group.for_each_group_mut(f);
        }
    }
}

impl Named for ItemGroupProperties {
    const KIND: &'static str = "item group";
    fn name(&self) -> &str {
        &self.name
    }
}

/// One screen of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenProperties {
    pub screen: ScreenType,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub num_cols: u32,
    pub item_groups: NamedContainer<ItemGroupProperties>,
}

impl ScreenProperties {
    pub fn new(screen: ScreenType) -> Self {
        Self {
            screen,
            width: None,
            height: None,
            num_cols: 1,
            item_groups: NamedContainer::new(),
        }
    }

    pub fn all_items(&self) -> Vec<&ScreenItemProperties> {
        self.item_groups.iter().flat_map(|g| g.all_items()).collect()
    }

    /// Finds a group anywhere in the nesting.
    pub fn find_group(&self, name: &str) -> Option<&ItemGroupProperties> {
        fn find<'a>(groups: &'a NamedContainer<ItemGroupProperties>, name: &str) -> Option<&'a ItemGroupProperties> {
            if let Some(g) = groups.get(name) {
                return Some(g);
            }
            groups.iter().find_map(|g| find(&g.groups, name))
        }
        find(&self.item_groups, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_defaults_differ_per_variant() {
        assert!(!ScreenItemProperties::new(ScreenType::Main).validate_from_lov);
        assert!(ScreenItemProperties::new(ScreenType::Query).validate_from_lov);
        assert_eq!(ScreenType::from_element("updateScreen"), Some(ScreenType::Update));
        assert_eq!(ScreenType::from_element("screen"), None);
    }

    #[test]
    fn test_nested_group_lookup() {
        let mut outer = ItemGroupProperties::new(ScreenType::Main, "OUTER");
        outer.groups.insert(ItemGroupProperties::new(ScreenType::Main, "INNER"), "OUTER").unwrap();
        let mut screen = ScreenProperties::new(ScreenType::Main);
        screen.item_groups.insert(outer, "main").unwrap();
        assert!(screen.find_group("INNER").is_some());
        assert!(screen.find_group("OTHER").is_none());
    }
}
