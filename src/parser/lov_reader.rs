//! Readers for LOV definitions and the mappings blocks hold onto them.

use super::attrs::{parse_u32, text, unexpected};
use super::block_reader::BlockFrame;
use super::extension_reader::ExtensionGroupFrame;
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::{FormError, FormResult};
use crate::model::{LovDefinitionProperties, LovItemMap, LovMappingProperties, RendererKind};
use crate::registry::ComponentKind;

/// `<lovDefinition>`: inline, a reference to a reusable one, or the root of
/// a `.lovdef` stream.
pub struct LovDefinitionFrame {
    lov: LovDefinitionProperties,
}

impl LovDefinitionFrame {
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        Self::open_with_default(start, None)
    }

    /// Root of a `.lovdef` stream: the definition is named after the stream
    /// unless it says otherwise.
    pub fn open_root(start: &ElementStart, stream_name: &str) -> FormResult<Self> {
        Self::open_with_default(start, Some(stream_name))
    }

    fn open_with_default(start: &ElementStart, default_name: Option<&str>) -> FormResult<Self> {
        let attrs = &start.attrs;
        let is_referenced = attrs.flag("isReferenced", false)?;
        let referenced = attrs.string("referencedLovDefinitionName");
        let name = match (attrs.string("name"), default_name, is_referenced) {
            (Some(name), _, _) => name,
            (None, Some(name), _) => name.to_string(),
            (None, None, true) => referenced
                .clone()
                .ok_or_else(|| FormError::missing_attribute("lovDefinition", "referencedLovDefinitionName"))?,
            (None, None, false) => return Err(FormError::missing_attribute("lovDefinition", "name")),
        };
        let mut lov = LovDefinitionProperties::new(name);
        lov.is_referenced = is_referenced;
        lov.referenced_lov_definition_name = referenced;
        lov.allow_user_query = attrs.flag("allowUserQuery", true)?;
        lov.automatic_query = attrs.flag("automaticQuery", false)?;
        Ok(Self { lov })
    }
}

impl ElementHandler for LovDefinitionFrame {
    fn owner(&self) -> &str {
        "lovDefinition"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "block" => Step::delegate(BlockFrame::open(start)?),
            "lovRendererProperties" => Step::delegate(ExtensionGroupFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let lov = &mut self.lov;
        match end.tag.as_str() {
            "description" => lov.description = text(&end.text),
            "width" => lov.width = Some(parse_u32(&end.text, "width")?),
            "height" => lov.height = Some(parse_u32(&end.text, "height")?),
            "actionProcessor" => lov.action_processor = text(&end.text),
            "lovRendererName" => lov.renderer_name = text(&end.text),
            tag => return Err(unexpected(tag, "lovDefinition")),
        }
        Ok(())
    }

    fn integrate(&mut self, session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::Block(definition) => {
                let mut definition = *definition;
                definition.block.lov_definition_name = Some(self.lov.name.clone());
                for lov in definition.lov_definitions.into_values() {
                    session.absorb_lov(lov);
                }
                self.lov.block = Some(definition.block);
            }
            Parsed::ExtensionGroup(group) => self.lov.renderer_properties = group,
            other => return Err(unexpected(other.describe(), "lovDefinition")),
        }
        Ok(())
    }

    fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        session.check_renderer(RendererKind::Lov, self.lov.renderer_name.as_deref())?;
        session.check_component(ComponentKind::ActionProcessor, self.lov.action_processor.as_deref())?;
        Ok(Parsed::LovDefinition(Box::new(self.lov)))
    }
}

/// `<lovMapping name="..." lovDefinitionName="...">`.
pub struct LovMappingFrame {
    mapping: LovMappingProperties,
}

impl LovMappingFrame {
    pub fn open(start: &ElementStart, block_name: &str) -> FormResult<Self> {
        let name = start.attrs.required("lovMapping", "name")?;
        let lov = start.attrs.required("lovMapping", "lovDefinitionName")?;
        Ok(Self {
            mapping: LovMappingProperties::new(name, block_name, lov),
        })
    }
}

impl ElementHandler for LovMappingFrame {
    fn owner(&self) -> &str {
        "lovMapping"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        if start.tag == "itemMap" {
            self.mapping.item_maps.push(LovItemMap {
                lov_definition_item: start.attrs.required("itemMap", "lovDefinitionItem")?,
                block_item: start.attrs.required("itemMap", "blockItem")?,
            });
        }
        Ok(Step::Continue)
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        match end.tag.as_str() {
            "displayName" => self.mapping.display_name = text(&end.text),
            "itemMapList" | "itemMap" => {}
            tag => return Err(unexpected(tag, "lovMapping")),
        }
        Ok(())
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::LovMapping(self.mapping))
    }
}
