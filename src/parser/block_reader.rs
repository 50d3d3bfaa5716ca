/*!
# Block Readers

`BlockFrame` reads a `<block>` wherever it appears (form, LOV definition,
reusable block). A block declared with `referenced="true"` is only a set of
overrides: at its end the reusable block it names is imported in its place.

`BlockDefinitionFrame` is the root reader of a `.block` stream.
*/

use tracing::debug;

use super::attrs::{parse_bool, parse_u32, text, unexpected};
use super::extension_reader::ExtensionGroupFrame;
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::item_group_reader::ScreenFrame;
use super::item_reader::ItemFrame;
use super::lov_reader::{LovDefinitionFrame, LovMappingFrame};
use super::session::ParseSession;
use crate::core::{FormError, FormResult, MessageKey};
use crate::import::{import_declared_lov, import_referenced_block};
use crate::model::{
    BlockDefinition, BlockProperties, LovDefinitionProperties, NamedContainer, RendererKind, ScreenType,
};
use crate::registry::ComponentKind;

pub struct BlockFrame {
    block: BlockProperties,
}

impl BlockFrame {
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        let attrs = &start.attrs;
        let mut block = BlockProperties::new(attrs.required("block", "name")?);
        block.is_referenced = attrs.flag("referenced", false)?;
        block.referenced_block_name = attrs.string("referencedBlockName");
        block.is_control_block = attrs.flag("controlBlock", false)?;
        if block.is_referenced && block.referenced_block_name.is_none() {
            return Err(FormError::missing_attribute("block", "referencedBlockName"));
        }
        Ok(Self { block })
    }
}

impl ElementHandler for BlockFrame {
    fn owner(&self) -> &str {
        "block"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        if let Some(screen) = ScreenType::from_element(&start.tag) {
            return Step::delegate(ScreenFrame::open(screen));
        }
        match start.tag.as_str() {
            "item" => Step::delegate(ItemFrame::open(start, &self.block.name)?),
            "lovMapping" => Step::delegate(LovMappingFrame::open(start, &self.block.name)?),
            "blockRendererProperties" => Step::delegate(ExtensionGroupFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let b = &mut self.block;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "description" => b.description = text(value),
            "canvasName" => b.canvas_name = text(value),
            "queryAllowed" => b.query_allowed = parse_bool(value, "queryAllowed")?,
            "insertAllowed" => b.insert_allowed = parse_bool(value, "insertAllowed")?,
            "updateAllowed" => b.update_allowed = parse_bool(value, "updateAllowed")?,
            "deleteAllowed" => b.delete_allowed = parse_bool(value, "deleteAllowed")?,
            "queryAllRows" => b.query_all_rows = parse_bool(value, "queryAllRows")?,
            "pageSize" => b.page_size = parse_u32(value, "pageSize")?,
            "displayedRecords" => b.displayed_records = parse_u32(value, "displayedRecords")?,
            "actionProcessor" => b.action_processor = text(value),
            "blockService" => b.block_service = text(value),
            "blockRendererName" => b.renderer_name = text(value),
            "itemList" | "lovMappingList" => {}
            tag => return Err(unexpected(tag, "block")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        let owner = self.block.name.clone();
        match child {
            Parsed::Item(item) => {
                self.block.items.insert(item, &owner)?;
            }
            Parsed::LovMapping(mapping) => {
                self.block.lov_mappings.insert(mapping, &owner)?;
            }
            Parsed::Screen(screen) => {
                let kind = screen.screen;
                *self.block.screen_mut(kind) = screen;
            }
            Parsed::ExtensionGroup(group) => self.block.renderer_properties = group,
            other => return Err(unexpected(other.describe(), "block")),
        }
        Ok(())
    }

    fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        if self.block.is_referenced {
            let definition = import_referenced_block(session, self.block)?;
            return Ok(Parsed::Block(Box::new(definition)));
        }
        validate_block(session, &self.block)?;
        Ok(Parsed::Block(Box::new(BlockDefinition::new(self.block))))
    }
}

/// Checks the block's internal references once all of its children are read.
fn validate_block(session: &ParseSession<'_>, block: &BlockProperties) -> FormResult<()> {
    for screen in ScreenType::ALL {
        for item in block.screen(screen).all_items() {
            if item.is_spacer {
                continue;
            }
            if let Some(name) = item.referenced_item_name.as_deref() {
                block.require_item(name)?;
            }
        }
    }

    for item in block.items.iter() {
        if let Some(mapping) = item.lov_mapping_name.as_deref() {
            if !block.lov_mappings.contains(mapping) {
                return Err(FormError::new(MessageKey::LovMappingNotFound, [mapping, block.name.as_str()]));
            }
        }
    }

    for mapping in block.lov_mappings.iter() {
        for map in &mapping.item_maps {
            block.require_item(&map.block_item)?;
        }
    }

    session.check_renderer(RendererKind::Block, block.renderer_name.as_deref())?;
    session.check_component(ComponentKind::ActionProcessor, block.action_processor.as_deref())?;
    session.check_component(ComponentKind::BlockService, block.block_service.as_deref())?;
    Ok(())
}

/// Root `<blockDefinition>` of a reusable block stream.
pub struct BlockDefinitionFrame {
    block: Option<BlockProperties>,
    inline_lovs: NamedContainer<LovDefinitionProperties>,
}

impl BlockDefinitionFrame {
    pub fn open(_start: &ElementStart) -> FormResult<Self> {
        Ok(Self {
            block: None,
            inline_lovs: NamedContainer::new(),
        })
    }
}

impl ElementHandler for BlockDefinitionFrame {
    fn owner(&self) -> &str {
        "blockDefinition"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "block" => Step::delegate(BlockFrame::open(start)?),
            "lovDefinition" => Step::delegate(LovDefinitionFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        match end.tag.as_str() {
            "lovDefinitionList" => Ok(()),
            tag => Err(unexpected(tag, "blockDefinition")),
        }
    }

    fn integrate(&mut self, session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::Block(definition) => {
                let definition = *definition;
                if let Some(existing) = &self.block {
                    return Err(FormError::duplicate("block", &definition.block.name, &existing.name));
                }
                for lov in definition.lov_definitions.into_values() {
                    session.absorb_lov(lov);
                }
                self.block = Some(definition.block);
            }
            Parsed::LovDefinition(lov) if lov.is_referenced => {
                import_declared_lov(session, &lov)?;
            }
            Parsed::LovDefinition(lov) => {
                self.inline_lovs.insert(*lov, session.name())?;
            }
            other => return Err(unexpected(other.describe(), "blockDefinition")),
        }
        Ok(())
    }

    fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        let mut block = self.block.ok_or_else(|| {
            FormError::new(MessageKey::MissingProperty, ["block definition", session.name(), "block"])
        })?;

        // внутри импортированного блока локальные LOV тоже получают область видимости
        let mut lovs = Vec::with_capacity(self.inline_lovs.len());
        for mut lov in self.inline_lovs.into_values() {
            if session.scope().is_some() {
                let scoped = session.scoped_lov_name(&lov.name);
                session.record_lov_rename(&lov.name, &scoped);
                lov.name = scoped;
                if let Some(lov_block) = lov.block.as_mut() {
                    lov_block.lov_definition_name = Some(lov.name.clone());
                }
            }
            lovs.push(lov);
        }

        session.share_direct_lov_imports();
        let mut lov_definitions = NamedContainer::new();
        for lov in lovs.into_iter().chain(session.take_imported_lovs()) {
            lov_definitions.insert_if_absent(lov);
        }
        session.apply_lov_renames_to_block(&mut block);
        for lov in lov_definitions.iter_mut() {
            session.apply_lov_renames_to_group(&mut lov.renderer_properties);
            if let Some(lov_block) = lov.block.as_mut() {
                session.apply_lov_renames_to_block(lov_block);
            }
        }
        debug!(
            "read block definition {} ({} items, {} lov definitions)",
            block.name,
            block.items.len(),
            lov_definitions.len()
        );
        Ok(Parsed::BlockDefinition(Box::new(BlockDefinition { block, lov_definitions })))
    }
}
