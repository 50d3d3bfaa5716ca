//! Merge of an `.objgroup` definition into the form that lists it.

use tracing::debug;

use crate::core::FormResult;
use crate::loader::DefinitionKind;
use crate::model::{CanvasTree, FormProperties};
use crate::parser::{self, ParseSession};

/// Reads object group `group` and splices it into `form`.
///
/// Blocks, relations and LOV definitions are copied; relations are resolved
/// again against the host's blocks. A top-level canvas whose name the host
/// already uses replaces the host canvas in place with the host's geometry
/// and placement kept. Popups replace same-named popups wholesale. Any other
/// name collision is an error.
///
/// Returns the names of the group's top-level canvases and popups, so that a
/// host canvas declared later can still hand over its geometry.
pub fn merge_object_group(
    session: &mut ParseSession<'_>,
    form: &mut FormProperties,
    group: &str,
) -> FormResult<Vec<String>> {
    let mut child = session.nested(DefinitionKind::ObjectGroup, group, None)?;
    let text = session.loader().read_definition(DefinitionKind::ObjectGroup, group)?;
    let imported = parser::read_form(&mut child, &text)?;

    let roots: Vec<CanvasTree> = imported
        .canvases
        .root_ids()
        .iter()
        .filter_map(|id| imported.canvases.subtree(*id))
        .collect();
    let popups: Vec<CanvasTree> = imported
        .canvases
        .popup_ids()
        .iter()
        .filter_map(|id| imported.canvases.subtree(*id))
        .collect();

    let host = form.name.clone();
    let supplied: Vec<String> = roots.iter().chain(&popups).map(|t| t.name().to_string()).collect();
    for tree in roots {
        if form.canvases.contains(tree.name()) {
            debug!("object group {} replaces canvas {} of {}", group, tree.name(), host);
            form.canvases.replace_keeping_geometry(tree, &host)?;
        } else {
            form.canvases.insert_root(tree, &host)?;
        }
    }
    for tree in popups {
        form.canvases.replace_popup(tree, &host)?;
    }

    for lov in imported.lov_definitions.into_values() {
        form.register_lov_definition(lov)?;
    }
    for block in imported.blocks.into_values() {
        form.blocks.insert(block, &host)?;
    }
    for mut relation in imported.relations.into_values() {
        relation.master_block = None;
        relation.detail_block = None;
        form.attach_relation(relation)?;
    }

    form.object_groups.push(group.to_string());
    debug!("merged object group {} into {}", group, host);
    Ok(supplied)
}
