//! List-of-values definitions and the block-side mappings onto them.

use serde::{Deserialize, Serialize};

use super::block::BlockProperties;
use super::container::Named;
use super::extension::ExtensionPropertyGroup;

/// A lookup definition, itself backed by a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LovDefinitionProperties {
    pub name: String,
    pub description: Option<String>,
    /// Imported from a reusable `.lovdef`.
    pub is_referenced: bool,
    pub referenced_lov_definition_name: Option<String>,
    pub allow_user_query: bool,
    pub automatic_query: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub action_processor: Option<String>,
    pub renderer_name: Option<String>,
    pub renderer_properties: ExtensionPropertyGroup,
    pub block: Option<BlockProperties>,
}

impl LovDefinitionProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_referenced: false,
            referenced_lov_definition_name: None,
            allow_user_query: true,
            automatic_query: false,
            width: None,
            height: None,
            action_processor: None,
            renderer_name: None,
            renderer_properties: ExtensionPropertyGroup::new("lovRendererProperties"),
            block: None,
        }
    }
}

impl Named for LovDefinitionProperties {
    const KIND: &'static str = "lov definition";
    fn name(&self) -> &str {
        &self.name
    }
}

/// Copies a LOV definition item into a block item on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LovItemMap {
    pub lov_definition_item: String,
    pub block_item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LovMappingProperties {
    pub name: String,
    pub block_name: String,
    pub lov_definition_name: String,
    pub display_name: Option<String>,
    pub item_maps: Vec<LovItemMap>,
}

impl LovMappingProperties {
    pub fn new(name: impl Into<String>, block_name: impl Into<String>, lov_definition_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            block_name: block_name.into(),
            lov_definition_name: lov_definition_name.into(),
            display_name: None,
            item_maps: Vec::new(),
        }
    }
}

impl Named for LovMappingProperties {
    const KIND: &'static str = "lov mapping";
    fn name(&self) -> &str {
        &self.name
    }
}
