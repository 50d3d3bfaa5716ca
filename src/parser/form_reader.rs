/*!
# Form Reader

Root reader of `.form` and `.objgroup` streams. Children are integrated in
document order: relations resolve against blocks that are already complete,
object groups merge into whatever the form holds when they are listed.
A canvas of the form that an earlier object group already supplied keeps
the group's content and takes the form's geometry, the same result as when
the group is listed after the canvas.
Cross-references that may point forward (block canvases, LOV mappings, the
first navigable block) are checked once the form is closed.
*/

use std::collections::HashSet;


use tracing::debug;

use super::attrs::{parse_u32, text, unexpected};
use super::block_reader::BlockFrame;
use super::canvas_reader::CanvasFrame;
use super::extension_reader::ExtensionGroupFrame;
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::lov_reader::LovDefinitionFrame;
use super::relation_reader::RelationFrame;
use super::session::ParseSession;
use crate::core::{FormError, FormResult, MessageKey};
use crate::import::{import_declared_lov, merge_object_group};
use crate::loader::DefinitionKind;
use crate::model::{FormParameter, FormProperties, RendererKind};
use crate::registry::ComponentKind;

pub struct FormFrame {
    form: FormProperties,
    declared_name: Option<String>,
    /// Canvases supplied by object groups merged so far.
    group_canvases: HashSet<String>,
}

impl FormFrame {
    pub fn open(session: &ParseSession<'_>, start: &ElementStart) -> FormResult<Self> {
        let declared_name = start.attrs.string("name");
        Ok(Self {
            form: FormProperties::new(session.name()),
            declared_name,
            group_canvases: HashSet::new(),
        })
    }
}

impl ElementHandler for FormFrame {
    fn owner(&self) -> &str {
        "form"
    }

    fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "canvas" => Step::delegate(CanvasFrame::open(start)?),
            "lovDefinition" => Step::delegate(LovDefinitionFrame::open(start)?),
            "block" => Step::delegate(BlockFrame::open(start)?),
            "relation" => Step::delegate(RelationFrame::open(start)?),
            "formRendererProperties" => Step::delegate(ExtensionGroupFrame::open(start)?),
            "formParameter" => {
                let parameter = FormParameter {
                    name: start.attrs.required("formParameter", "name")?,
                    data_type: start.attrs.string("dataType"),
                    default_value: start.attrs.string("defaultValue"),
                };
                let owner = self.form.name.clone();
                self.form.parameters.insert(parameter, &owner)?;
                Ok(Step::Continue)
            }
            "objectGroup" => {
                let group = start.attrs.required("objectGroup", "name")?;
                let supplied = merge_object_group(session, &mut self.form, &group)?;
                self.group_canvases.extend(supplied);
                Ok(Step::Continue)
            }
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let f = &mut self.form;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "title" => f.title = text(value),
            "displayName" => f.display_name = text(value),
            "width" => f.width = Some(parse_u32(value, "width")?),
            "height" => f.height = Some(parse_u32(value, "height")?),
            "numCols" => f.num_cols = parse_u32(value, "numCols")?,
            "actionProcessor" => f.action_processor = text(value),
            "formRendererName" => f.renderer_name = text(value),
            "firstNavigableBlock" => f.first_navigable_block = text(value),
            "canvasList" | "lovDefinitionList" | "blockList" | "relationList" | "objectGroupList"
            | "objectGroup" | "formParameterList" | "formParameter" => {}
            tag => return Err(unexpected(tag, "form")),
        }
        Ok(())
    }

    fn integrate(&mut self, session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        let owner = self.form.name.clone();
        match child {
            Parsed::Canvas(tree) if self.group_canvases.contains(tree.name()) => {
                debug!("canvas {} of {} keeps the object group's content", tree.name(), owner);
                self.form.canvases.adopt_host_canvas(tree, &owner)?;
            }
            Parsed::Canvas(tree) => {
                self.form.canvases.insert_root(tree, &owner)?;
            }
            Parsed::LovDefinition(lov) if lov.is_referenced => {
                import_declared_lov(session, &lov)?;
            }
            Parsed::LovDefinition(lov) => self.form.register_lov_definition(*lov)?,
            Parsed::Block(definition) => {
                let definition = *definition;
                for lov in definition.lov_definitions.into_values() {
                    session.absorb_lov(lov);
                }
                self.form.blocks.insert(definition.block, &owner)?;
            }
            // блоки объектной группы могут быть связаны с блоками хозяина
            Parsed::Relation(relation) if session.kind() == DefinitionKind::ObjectGroup => {
                self.form.relations.insert(relation, &owner)?;
            }
            Parsed::Relation(relation) => self.form.attach_relation(relation)?,
            Parsed::ExtensionGroup(group) => self.form.renderer_properties = group,
            other => return Err(unexpected(other.describe(), "form")),
        }
        Ok(())
    }

    fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        let mut form = self.form;
        if let Some(declared) = self.declared_name {
            if declared != form.name {
                return Err(FormError::new(MessageKey::FormNameMismatch, [session.source_name(), declared.as_str()]));
            }
        }

        session.share_direct_lov_imports();
        for lov in session.take_imported_lovs() {
            form.register_lov_definition(lov)?;
        }
        for block in form.blocks.iter_mut() {
            session.apply_lov_renames_to_mappings(block);
        }
        for lov in form.lov_definitions.iter_mut() {
            if let Some(lov_block) = lov.block.as_mut() {
                session.apply_lov_renames_to_mappings(lov_block);
            }
        }
        form.for_each_extension_group_mut(&mut |group| session.apply_lov_renames_to_group(group));

        validate_form(session, &form)?;
        debug!(
            "read form {} ({} blocks, {} canvases, {} lov definitions)",
            form.name,
            form.blocks.len(),
            form.canvases.len(),
            form.lov_definitions.len()
        );
        Ok(Parsed::Form(Box::new(form)))
    }
}

fn validate_form(session: &ParseSession<'_>, form: &FormProperties) -> FormResult<()> {
    // объектная группа может ссылаться на канвы и LOV формы-хозяина;
    // её ссылки проверяются уже в составе хозяина
    if session.kind() != DefinitionKind::ObjectGroup {
        validate_references(form)?;
    }
    session.check_renderer(RendererKind::Form, form.renderer_name.as_deref())?;
    session.check_component(ComponentKind::ActionProcessor, form.action_processor.as_deref())?;
    Ok(())
}

fn validate_references(form: &FormProperties) -> FormResult<()> {
    for block in form.blocks.iter() {
        if let Some(canvas) = block.canvas_name.as_deref() {
            form.require_canvas(canvas)?;
        }
        for mapping in block.lov_mappings.iter() {
            let lov = form.require_lov_definition(&mapping.lov_definition_name)?;
            if let Some(lov_block) = lov.block.as_ref() {
                for map in &mapping.item_maps {
                    if lov_block.item(&map.lov_definition_item).is_none() {
                        return Err(FormError::no_item_on_block(&map.lov_definition_item, &lov.name));
                    }
                }
            }
        }
    }

    if let Some(first) = form.first_navigable_block.as_deref() {
        form.require_block(first)?;
    }
    Ok(())
}
