/*!
# Parse Session

State of one definition parse: which definition is being read, the import
chain leading to it (for cycle detection), the scope imported LOV names are
prefixed with, and the LOV definitions imported so far together with the
renames that must be applied to references once the definition is complete.

A session borrows the [`DefinitionLoader`], which is the only way readers
reach application properties, the component registry and other definitions.
*/

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::core::{FormError, FormResult, MessageKey};
use crate::import::ScopedName;
use crate::loader::{DefinitionKind, DefinitionLoader};
use crate::model::{
    ApplicationProperties, BlockProperties, ExtensionPropertyGroup, LovDefinitionProperties, NamedContainer,
    RendererKind,
};
use crate::registry::ComponentKind;

pub struct ParseSession<'l> {
    loader: &'l DefinitionLoader,
    kind: DefinitionKind,
    name: String,
    source_name: String,
    /// Alias of the referenced block this definition is being imported as.
    scope: Option<String>,
    chain: Vec<(DefinitionKind, String)>,
    imported_lovs: NamedContainer<LovDefinitionProperties>,
    /// Original LOV name -> scoped name.
    lov_renames: HashMap<String, String>,
    generated: usize,
}

impl<'l> ParseSession<'l> {
    pub fn new(loader: &'l DefinitionLoader, kind: DefinitionKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            loader,
            kind,
            source_name: kind.file_name(&name),
            chain: vec![(kind, name.clone())],
            name,
            scope: None,
            imported_lovs: NamedContainer::new(),
            lov_renames: HashMap::new(),
            generated: 0,
        }
    }

    /// Session for a definition imported by this one. Fails when `name` is
    /// already being loaded further up the chain.
    pub fn nested(&self, kind: DefinitionKind, name: &str, scope: Option<String>) -> FormResult<ParseSession<'l>> {
        if self.chain.iter().any(|(k, n)| *k == kind && n == name) {
            let path = self
                .chain
                .iter()
                .map(|(k, n)| k.file_name(n))
                .chain(std::iter::once(kind.file_name(name)))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(FormError::new(MessageKey::CyclicReference, [kind.file_name(name), path]));
        }
        let mut chain = self.chain.clone();
        chain.push((kind, name.to_string()));
        Ok(ParseSession {
            loader: self.loader,
            kind,
            name: name.to_string(),
            source_name: kind.file_name(name),
            scope,
            chain,
            imported_lovs: NamedContainer::new(),
            lov_renames: HashMap::new(),
            generated: 0,
        })
    }

    pub fn loader(&self) -> &'l DefinitionLoader {
        self.loader
    }

    pub fn application(&self) -> Arc<ApplicationProperties> {
        self.loader.application()
    }

    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Scoped identity of an imported LOV definition in this session.
    pub fn scoped_lov_name(&self, original: &str) -> String {
        ScopedName::new(self.scope.as_deref(), original).to_string()
    }

    /// Name for an element that may omit its own (spacers, separators).
    pub fn generate_name(&mut self, prefix: &str) -> String {
        self.generated += 1;
        format!("_{}_{}", prefix, self.generated)
    }

    /// Imports the reusable LOV definition `original` once per scoped name
    /// and returns the scoped name.
    pub fn import_lov(&mut self, original: &str) -> FormResult<String> {
        let scoped = self.scoped_lov_name(original);
        if self.imported_lovs.contains(&scoped) {
            debug!("lov definition {} already imported into {}", scoped, self.source_name);
            return Ok(scoped);
        }
        // .lovdef читается внутри цепочки импорта: цикл через другие файлы виден здесь
        let mut child = self.nested(DefinitionKind::ReusableLov, original, None)?;
        let shared = self.loader.load_lov_definition_in(&mut child)?;
        let mut lov = (*shared).clone();
        lov.name = scoped.clone();
        lov.is_referenced = true;
        lov.referenced_lov_definition_name = Some(original.to_string());
        if let Some(block) = lov.block.as_mut() {
            block.lov_definition_name = Some(scoped.clone());
        }
        debug!("imported lov definition {} as {} into {}", original, scoped, self.source_name);
        self.imported_lovs.insert_if_absent(lov);
        Ok(scoped)
    }

    /// Registers an already scoped LOV definition (e.g. one brought in by a
    /// referenced block). Idempotent on the name.
    pub fn absorb_lov(&mut self, lov: LovDefinitionProperties) {
        self.imported_lovs.insert_if_absent(lov);
    }

    /// A reusable LOV this definition imports in its own scope is also the one
    /// its referenced blocks use: their copies under other scopes are dropped
    /// and references to them are renamed to the direct import.
    pub fn share_direct_lov_imports(&mut self) {
        let own_scope = self.scope.clone();
        let direct: HashSet<String> = self
            .imported_lovs
            .names()
            .filter_map(ScopedName::parse)
            .filter(|scoped| scoped.scope == own_scope)
            .map(|scoped| scoped.name)
            .collect();
        if direct.is_empty() {
            return;
        }

        let mut shared = Vec::new();
        self.imported_lovs.retain(|lov| {
            let Some(scoped) = ScopedName::parse(&lov.name) else {
                return true;
            };
            let transitive = scoped.scope != own_scope
                && lov.is_referenced
                && lov.referenced_lov_definition_name.as_deref() == Some(scoped.name.as_str())
                && direct.contains(&scoped.name);
            if transitive {
                let target = ScopedName::new(own_scope.as_deref(), &scoped.name).to_string();
                shared.push((lov.name.clone(), target));
            }
            !transitive
        });
        for (from, to) in shared {
            debug!("{} shares lov definition {} as {}", self.source_name, from, to);
            self.record_lov_rename(&from, &to);
        }
    }

    pub fn record_lov_rename(&mut self, original: &str, scoped: &str) {
        if original != scoped {
            self.lov_renames.insert(original.to_string(), scoped.to_string());
        }
    }

    pub fn take_imported_lovs(&mut self) -> Vec<LovDefinitionProperties> {
        std::mem::take(&mut self.imported_lovs).into_values().collect()
    }

    pub fn renamed_lov<'a>(&'a self, name: &'a str) -> &'a str {
        self.lov_renames.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Points LOV mappings and LOV-kind properties of `block` at renamed LOV
    /// definitions.
    pub fn apply_lov_renames_to_block(&self, block: &mut BlockProperties) {
        if self.lov_renames.is_empty() {
            return;
        }
        self.apply_lov_renames_to_mappings(block);
        block.for_each_extension_group_mut(&mut |group| self.apply_lov_renames_to_group(group));
    }

    /// Points LOV mappings of `block` at renamed LOV definitions.
    pub fn apply_lov_renames_to_mappings(&self, block: &mut BlockProperties) {
        for mapping in block.lov_mappings.iter_mut() {
            if let Some(scoped) = self.lov_renames.get(&mapping.lov_definition_name) {
                mapping.lov_definition_name = scoped.clone();
            }
        }
    }

    /// Rewrites LOV reference values of extension properties.
    pub fn apply_lov_renames_to_group(&self, group: &mut ExtensionPropertyGroup) {
        if self.lov_renames.is_empty() {
            return;
        }
        group.for_each_property_mut(&mut |property| {
            let renamed = property
                .lov_definition_name()
                .and_then(|name| self.lov_renames.get(name))
                .cloned();
            if let Some(scoped) = renamed {
                property.set_lov_definition_name(&scoped);
            }
        });
    }

    pub fn check_renderer(&self, kind: RendererKind, name: Option<&str>) -> FormResult<()> {
        match name {
            Some(name) if self.loader.config().validation.renderers => {
                self.application().require_renderer(kind, name).map(|_| ())
            }
            _ => Ok(()),
        }
    }

    pub fn check_visual_attribute(&self, name: Option<&str>) -> FormResult<()> {
        match name {
            Some(name) if self.loader.config().validation.visual_attributes => {
                self.application().require_visual_attribute(name).map(|_| ())
            }
            _ => Ok(()),
        }
    }

    pub fn check_component(&self, kind: ComponentKind, name: Option<&str>) -> FormResult<()> {
        match name {
            Some(name) if self.loader.config().validation.action_processors => {
                self.loader.registry().require(kind, name)
            }
            _ => Ok(()),
        }
    }
}
