//! Import of a reusable `.block` definition under a host-supplied alias.

use tracing::debug;

use super::scoped::rewrite_block_item_refs;
use crate::core::{FormError, FormResult};
use crate::loader::DefinitionKind;
use crate::model::{BlockDefinition, BlockProperties};
use crate::parser::{self, ParseSession};

/// Replaces the host's `<block referenced="true">` declaration with the
/// reusable block it names.
///
/// The reusable block is parsed in its own session scoped by the alias, so
/// LOV definitions it carries come back as `ALIAS.[NAME]`. The host may only
/// override items' default query/insert values and the canvas.
pub fn import_referenced_block(session: &mut ParseSession<'_>, host: BlockProperties) -> FormResult<BlockDefinition> {
    let alias = host.name.clone();
    let original = host
        .referenced_block_name
        .clone()
        .ok_or_else(|| FormError::missing_attribute("block", "referencedBlockName"))?;

    let mut child = session.nested(DefinitionKind::ReusableBlock, &original, Some(alias.clone()))?;
    let text = session.loader().read_definition(DefinitionKind::ReusableBlock, &original)?;
    let mut definition = parser::read_block_definition(&mut child, &text)?;

    apply_item_overrides(&mut definition.block, &host, &original)?;
    if host.canvas_name.is_some() {
        definition.block.canvas_name = host.canvas_name.clone();
    }

    let block = &mut definition.block;
    block.name = alias.clone();
    block.referenced_block_name = Some(original.clone());
    block.is_referenced = true;
    for item in block.items.iter_mut() {
        item.block_name = alias.clone();
    }
    for mapping in block.lov_mappings.iter_mut() {
        mapping.block_name = alias.clone();
    }

    for lov in definition.lov_definitions.iter_mut() {
        let Some(lov_block) = lov.block.as_mut() else {
            continue;
        };
        for item in lov_block.items.iter_mut() {
            if let Some(rewritten) = item
                .default_query_value
                .as_deref()
                .and_then(|v| rewrite_block_item_refs(v, &original, &alias))
            {
                debug!("{}: rewrote default query value of {}.{} to {}", alias, lov.name, item.name, rewritten);
                item.default_query_value = Some(rewritten);
            }
        }
    }

    debug!(
        "imported block {} as {} with {} lov definitions",
        original,
        alias,
        definition.lov_definitions.len()
    );
    Ok(definition)
}

fn apply_item_overrides(block: &mut BlockProperties, host: &BlockProperties, original: &str) -> FormResult<()> {
    for overriding in host.items.iter() {
        let target = block
            .items
            .get_mut(&overriding.name)
            .ok_or_else(|| FormError::no_item_on_block(&overriding.name, original))?;
        if overriding.default_query_value.is_some() {
            target.default_query_value = overriding.default_query_value.clone();
        }
        if overriding.default_insert_value.is_some() {
            target.default_insert_value = overriding.default_insert_value.clone();
        }
        if overriding.data_type.is_some() || overriding.lov_mapping_name.is_some() || overriding.renderer_name.is_some() {
            debug!(
                "{}.{}: only default values can be overridden on a referenced block; other settings ignored",
                host.name, overriding.name
            );
        }
    }
    Ok(())
}
