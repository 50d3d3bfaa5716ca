//! Readers for block items and their per-screen appearances.

use super::attrs::{parse_bool, text, unexpected};
use super::extension_reader::ExtensionGroupFrame;
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::FormResult;
use crate::model::{BlockItemProperties, RendererKind, ScreenItemProperties, ScreenType};

/// `<item name="...">` inside a block's `<itemList>`.
pub struct ItemFrame {
    item: BlockItemProperties,
}

impl ItemFrame {
    pub fn open(start: &ElementStart, block_name: &str) -> FormResult<Self> {
        let name = start.attrs.required("item", "name")?;
        Ok(Self {
            item: BlockItemProperties::new(name, block_name),
        })
    }
}

impl ElementHandler for ItemFrame {
    fn owner(&self) -> &str {
        "item"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "itemRendererProperties" => Step::delegate(ExtensionGroupFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let item = &mut self.item;
        match end.tag.as_str() {
            "dataType" => item.data_type = text(&end.text),
            "fieldName" => item.field_name = text(&end.text),
            "blockServiceItem" => item.block_service_item = parse_bool(&end.text, "blockServiceItem")?,
            "defaultQueryValue" => item.default_query_value = text(&end.text),
            "defaultInsertValue" => item.default_insert_value = text(&end.text),
            "lovMappingName" => item.lov_mapping_name = text(&end.text),
            "visualAttributeName" => item.visual_attribute_name = text(&end.text),
            "actionCommand" => item.action_command = text(&end.text),
            "itemRendererName" => item.renderer_name = text(&end.text),
            tag => return Err(unexpected(tag, "item")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::ExtensionGroup(group) => {
                self.item.renderer_properties = group;
                Ok(())
            }
            other => Err(unexpected(other.describe(), "item")),
        }
    }

    fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        session.check_renderer(RendererKind::Item, self.item.renderer_name.as_deref())?;
        session.check_visual_attribute(self.item.visual_attribute_name.as_deref())?;
        Ok(Parsed::Item(self.item))
    }
}

/// `<item referencedItemName="..." isSpacerItem="...">` inside an item group.
pub struct ScreenItemFrame {
    item: ScreenItemProperties,
}

impl ScreenItemFrame {
    pub fn open(session: &mut ParseSession<'_>, start: &ElementStart, screen: ScreenType) -> FormResult<Self> {
        let mut item = ScreenItemProperties::new(screen);
        item.is_spacer = start.attrs.flag("isSpacerItem", false)?;
        item.referenced_item_name = start.attrs.string("referencedItemName");
        item.name = match (&item.referenced_item_name, item.is_spacer) {
            (Some(name), _) => name.clone(),
            (None, true) => session.generate_name("spacer"),
            (None, false) => return Err(crate::core::FormError::missing_attribute("item", "referencedItemName")),
        };
        Ok(Self { item })
    }
}

impl ElementHandler for ScreenItemFrame {
    fn owner(&self) -> &str {
        "item"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "rendererProperties" => Step::delegate(ExtensionGroupFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let item = &mut self.item;
        match end.tag.as_str() {
            "label" => item.label = text(&end.text),
            "hint" => item.hint = text(&end.text),
            "visible" => item.visible = parse_bool(&end.text, "visible")?,
            "editAllowed" => item.editable = parse_bool(&end.text, "editAllowed")?,
            "mandatory" => item.mandatory = parse_bool(&end.text, "mandatory")?,
            "validateFromLov" => item.validate_from_lov = parse_bool(&end.text, "validateFromLov")?,
            "actionCommand" => item.action_command = text(&end.text),
            "visualAttributeName" => item.visual_attribute_name = text(&end.text),
            tag => return Err(unexpected(tag, "item")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::ExtensionGroup(group) => {
                self.item.renderer_properties = group;
                Ok(())
            }
            other => Err(unexpected(other.describe(), "item")),
        }
    }

    fn finish(mut self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        if self.item.screen == ScreenType::Query {
            self.item.editable = true;
        }
        session.check_visual_attribute(self.item.visual_attribute_name.as_deref())?;
        Ok(Parsed::ScreenItem(self.item))
    }
}
