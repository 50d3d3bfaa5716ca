/*!
# Form Properties

Root of a parsed form graph. Owns the blocks, the canvas arena, relations
and LOV definitions; everything else hangs off these.
*/

use serde::{Deserialize, Serialize};

use super::block::BlockProperties;
use super::canvas::{CanvasArena, CanvasProperties};
use super::container::{Named, NamedContainer};
use super::extension::ExtensionPropertyGroup;
use super::lov::LovDefinitionProperties;
use super::relation::{BlockId, RelationProperties};
use crate::core::{FormError, FormResult, MessageKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormParameter {
    pub name: String,
    pub data_type: Option<String>,
    pub default_value: Option<String>,
}

impl Named for FormParameter {
    const KIND: &'static str = "form parameter";
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormProperties {
    pub name: String,
    pub title: Option<String>,
    pub display_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub num_cols: u32,
    pub action_processor: Option<String>,
    pub renderer_name: Option<String>,
    pub renderer_properties: ExtensionPropertyGroup,
    pub first_navigable_block: Option<String>,
    pub parameters: NamedContainer<FormParameter>,
    pub canvases: CanvasArena,
    pub blocks: NamedContainer<BlockProperties>,
    pub relations: NamedContainer<RelationProperties>,
    pub lov_definitions: NamedContainer<LovDefinitionProperties>,
    /// Object groups merged into this form, in import order.
    pub object_groups: Vec<String>,
}

impl FormProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            display_name: None,
            width: None,
            height: None,
            num_cols: 1,
            action_processor: None,
            renderer_name: None,
            renderer_properties: ExtensionPropertyGroup::new("formRendererProperties"),
            first_navigable_block: None,
            parameters: NamedContainer::new(),
            canvases: CanvasArena::new(),
            blocks: NamedContainer::new(),
            relations: NamedContainer::new(),
            lov_definitions: NamedContainer::new(),
            object_groups: Vec::new(),
        }
    }

    pub fn block(&self, name: &str) -> Option<&BlockProperties> {
        self.blocks.get(name)
    }

    pub fn require_block(&self, name: &str) -> FormResult<&BlockProperties> {
        self.blocks
            .get(name)
            .ok_or_else(|| FormError::block_not_found(name, &self.name))
    }

    pub fn block_id(&self, name: &str) -> FormResult<BlockId> {
        self.blocks
            .index_of(name)
            .map(BlockId)
            .ok_or_else(|| FormError::block_not_found(name, &self.name))
    }

    pub fn block_by_id(&self, id: BlockId) -> Option<&BlockProperties> {
        self.blocks.get_index(id.0)
    }

    pub fn canvas(&self, name: &str) -> Option<&CanvasProperties> {
        self.canvases.by_name(name)
    }

    pub fn require_canvas(&self, name: &str) -> FormResult<&CanvasProperties> {
        self.canvas(name)
            .ok_or_else(|| FormError::canvas_not_found(name, &self.name))
    }

    pub fn lov_definition(&self, name: &str) -> Option<&LovDefinitionProperties> {
        self.lov_definitions.get(name)
    }

    pub fn require_lov_definition(&self, name: &str) -> FormResult<&LovDefinitionProperties> {
        self.lov_definition(name)
            .ok_or_else(|| FormError::new(MessageKey::LovDefinitionNotFound, [name, self.name.as_str()]))
    }

    /// Blocks displayed on the named canvas, in block order.
    pub fn blocks_on_canvas<'a>(&'a self, canvas: &'a str) -> impl Iterator<Item = &'a BlockProperties> + 'a {
        self.blocks
            .iter()
            .filter(move |b| b.canvas_name.as_deref() == Some(canvas))
    }

    /// Relations in which the named block is the master.
    pub fn relations_for_master<'a>(&'a self, block: &'a str) -> impl Iterator<Item = &'a RelationProperties> + 'a {
        self.relations
            .iter()
            .filter(move |r| r.master_block_name == block)
    }

    pub fn master_block(&self, relation: &RelationProperties) -> Option<&BlockProperties> {
        relation.master_block.and_then(|id| self.block_by_id(id))
    }

    pub fn detail_block(&self, relation: &RelationProperties) -> Option<&BlockProperties> {
        relation.detail_block.and_then(|id| self.block_by_id(id))
    }

    /// Resolves a relation against the blocks already attached to this form
    /// and appends it. A block that has not been read yet is an error, not a
    /// dangling reference.
    pub fn attach_relation(&mut self, mut relation: RelationProperties) -> FormResult<()> {
        let master = self.block_id(&relation.master_block_name)?;
        let detail = self.block_id(&relation.detail_block_name)?;

        for join in &relation.joins {
            self.blocks.get_index(master.0).map_or(Ok(()), |b| b.require_item(&join.master_item).map(|_| ()))?;
            self.blocks.get_index(detail.0).map_or(Ok(()), |b| b.require_item(&join.detail_item).map(|_| ()))?;
        }

        relation.master_block = Some(master);
        relation.detail_block = Some(detail);
        let owner = self.name.clone();
        self.relations.insert(relation, &owner)?;
        Ok(())
    }

    /// Adds a LOV definition. Scoped (imported) names are registered once;
    /// a second registration of the same scoped name is a no-op. Plain names
    /// must be unique.
    pub fn register_lov_definition(&mut self, lov: LovDefinitionProperties) -> FormResult<()> {
        if crate::import::ScopedName::is_scoped(&lov.name) {
            self.lov_definitions.insert_if_absent(lov);
            return Ok(());
        }
        let owner = self.name.clone();
        self.lov_definitions.insert(lov, &owner)?;
        Ok(())
    }

    /// Every extension property group in the form graph.
    pub fn for_each_extension_group_mut(&mut self, f: &mut dyn FnMut(&mut ExtensionPropertyGroup)) {
        f(&mut self.renderer_properties);
        for block in self.blocks.iter_mut() {
            block.for_each_extension_group_mut(f);
        }
        for lov in self.lov_definitions.iter_mut() {
            f(&mut lov.renderer_properties);
            if let Some(block) = lov.block.as_mut() {
                block.for_each_extension_group_mut(f);
            }
        }
    }
}

impl Named for FormProperties {
    const KIND: &'static str = "form";
    fn name(&self) -> &str {
        &self.name
    }
}
