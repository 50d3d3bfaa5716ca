/*!
# Block Properties

A block binds an ordered set of items to a data source and carries the
query/insert/update/delete switches, LOV mappings and the four screens the
runtime block controller works with.
*/

use serde::{Deserialize, Serialize};

use super::container::{Named, NamedContainer};
use super::extension::ExtensionPropertyGroup;
use super::item::{BlockItemProperties, ScreenProperties, ScreenType};
use super::lov::{LovDefinitionProperties, LovMappingProperties};
use crate::core::{FormError, FormResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockProperties {
    /// External name; for an imported block this is the host's alias.
    pub name: String,
    pub description: Option<String>,
    pub is_control_block: bool,
    pub is_referenced: bool,
    /// Internal identity of an imported block (the reusable block's name).
    pub referenced_block_name: Option<String>,
    /// Set when the block backs a LOV definition.
    pub lov_definition_name: Option<String>,
    pub canvas_name: Option<String>,
    pub query_allowed: bool,
    pub insert_allowed: bool,
    pub update_allowed: bool,
    pub delete_allowed: bool,
    pub query_all_rows: bool,
    pub page_size: u32,
    pub displayed_records: u32,
    pub action_processor: Option<String>,
    pub block_service: Option<String>,
    pub renderer_name: Option<String>,
    pub renderer_properties: ExtensionPropertyGroup,
    pub items: NamedContainer<BlockItemProperties>,
    pub lov_mappings: NamedContainer<LovMappingProperties>,
    pub main_screen: ScreenProperties,
    pub query_screen: ScreenProperties,
    pub insert_screen: ScreenProperties,
    pub update_screen: ScreenProperties,
}

impl BlockProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_control_block: false,
            is_referenced: false,
            referenced_block_name: None,
            lov_definition_name: None,
            canvas_name: None,
            query_allowed: true,
            insert_allowed: true,
            update_allowed: true,
            delete_allowed: true,
            query_all_rows: false,
            page_size: 0,
            displayed_records: 0,
            action_processor: None,
            block_service: None,
            renderer_name: None,
            renderer_properties: ExtensionPropertyGroup::new("blockRendererProperties"),
            items: NamedContainer::new(),
            lov_mappings: NamedContainer::new(),
            main_screen: ScreenProperties::new(ScreenType::Main),
            query_screen: ScreenProperties::new(ScreenType::Query),
            insert_screen: ScreenProperties::new(ScreenType::Insert),
            update_screen: ScreenProperties::new(ScreenType::Update),
        }
    }

    pub fn item(&self, name: &str) -> Option<&BlockItemProperties> {
        self.items.get(name)
    }

    pub fn require_item(&self, name: &str) -> FormResult<&BlockItemProperties> {
        self.items
            .get(name)
            .ok_or_else(|| FormError::no_item_on_block(name, &self.name))
    }

    pub fn screen(&self, screen: ScreenType) -> &ScreenProperties {
        match screen {
            ScreenType::Main => &self.main_screen,
            ScreenType::Query => &self.query_screen,
            ScreenType::Insert => &self.insert_screen,
            ScreenType::Update => &self.update_screen,
        }
    }

    pub fn screen_mut(&mut self, screen: ScreenType) -> &mut ScreenProperties {
        match screen {
            ScreenType::Main => &mut self.main_screen,
            ScreenType::Query => &mut self.query_screen,
            ScreenType::Insert => &mut self.insert_screen,
            ScreenType::Update => &mut self.update_screen,
        }
    }

    /// Identity used for lookups of imported blocks.
    pub fn internal_name(&self) -> &str {
        self.referenced_block_name.as_deref().unwrap_or(&self.name)
    }

    /// Every extension property group on the block, its items and screens.
    pub fn for_each_extension_group_mut(&mut self, f: &mut dyn FnMut(&mut ExtensionPropertyGroup)) {
        f(&mut self.renderer_properties);
        for item in self.items.iter_mut() {
            f(&mut item.renderer_properties);
        }
        for screen in ScreenType::ALL {
            for group in self.screen_mut(screen).item_groups.iter_mut() {
                group.for_each_group_mut(&mut |g| {
                    f(&mut g.renderer_properties);
                    for item in g.items.iter_mut() {
                        f(&mut item.renderer_properties);
                    }
                });
            }
        }
    }
}

impl Named for BlockProperties {
    const KIND: &'static str = "block";
    fn name(&self) -> &str {
        &self.name
    }
}

/// Result of reading a reusable `.block` definition: the block and the LOV
/// definitions it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub block: BlockProperties,
    pub lov_definitions: NamedContainer<LovDefinitionProperties>,
}

impl BlockDefinition {
    pub fn new(block: BlockProperties) -> Self {
        Self {
            block,
            lov_definitions: NamedContainer::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MessageKey;

    #[test]
    fn test_require_item_reports_block() {
        let mut block = BlockProperties::new("ORDERS");
        block.items.insert(BlockItemProperties::new("ID", "ORDERS"), "ORDERS").unwrap();
        assert!(block.require_item("ID").is_ok());
        let err = block.require_item("NAME").unwrap_err();
        assert_eq!(err.key(), MessageKey::NoItemOnBlock);
        assert_eq!(err.args(), ["NAME", "ORDERS"]);
    }
}
