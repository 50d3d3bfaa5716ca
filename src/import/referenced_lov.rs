//! Import of reusable `.lovdef` definitions, either declared explicitly in
//! a `<lovDefinitionList>` or named by a LOV-kind extension property.

use tracing::debug;

use super::scoped::ScopedName;
use crate::core::{FormError, FormResult};
use crate::loader::DefinitionKind;
use crate::model::{ExtensionProperty, LovDefinitionProperties};
use crate::parser::ParseSession;

/// Imports the definition a `<lovDefinition isReferenced="true">` points at
/// and remembers that references to the declared name mean the scoped one.
pub fn import_declared_lov(session: &mut ParseSession<'_>, declared: &LovDefinitionProperties) -> FormResult<String> {
    let original = declared
        .referenced_lov_definition_name
        .as_deref()
        .ok_or_else(|| FormError::missing_attribute("lovDefinition", "referencedLovDefinitionName"))?;
    let scoped = session.import_lov(original)?;
    session.record_lov_rename(&declared.name, &scoped);
    Ok(scoped)
}

/// While a reusable block is being read, a LOV-kind property naming a
/// reusable LOV definition imports it eagerly and points at the scoped name.
pub fn import_property_lov(session: &mut ParseSession<'_>, property: &mut ExtensionProperty) -> FormResult<()> {
    if session.kind() != DefinitionKind::ReusableBlock || !property.kind.is_lov_reference() {
        return Ok(());
    }
    let Some(name) = property.lov_definition_name().map(str::to_string) else {
        return Ok(());
    };
    if ScopedName::is_scoped(&name) || !session.loader().source().exists(DefinitionKind::ReusableLov, &name) {
        return Ok(());
    }
    let scoped = session.import_lov(&name)?;
    debug!("property {} now refers to {}", property.name, scoped);
    session.record_lov_rename(&name, &scoped);
    property.set_lov_definition_name(&scoped);
    Ok(())
}
