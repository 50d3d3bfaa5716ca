/*!
# Definition Loader

The context object of a definition store: configuration, the source the
streams are read from, the application properties, the component registry
and the caches of parsed definitions. One loader is created at startup and
shared (by reference or `Arc`) between every thread that loads forms.

## Usage

```rust,ignore
use formdef::{ComponentRegistry, DefinitionLoader, FileSystemSource, LoaderConfig};

let config = LoaderConfig::discover(".")?;
let source = FileSystemSource::new(&config);
let loader = DefinitionLoader::new(config, source, ComponentRegistry::new())?;
let form = loader.load_form("ORDERS")?;
```
*/

pub mod cache;
pub mod source;

pub use cache::{CacheStats, PropertiesCache};
pub use source::{DefinitionKind, DefinitionSource, FileSystemSource, InMemorySource};

use std::io;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::core::{FormError, FormResult, MessageKey};
use crate::model::{ApplicationProperties, BlockDefinition, FormProperties, LovDefinitionProperties};
use crate::parser::{self, ParseSession};
use crate::registry::ComponentRegistry;

/// Cache statistics per definition kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderStats {
    pub forms: CacheStats,
    pub block_definitions: CacheStats,
    pub lov_definitions: CacheStats,
}

pub struct DefinitionLoader {
    config: LoaderConfig,
    source: Box<dyn DefinitionSource>,
    application: Arc<ApplicationProperties>,
    registry: ComponentRegistry,
    forms: PropertiesCache<FormProperties>,
    block_definitions: PropertiesCache<BlockDefinition>,
    lov_definitions: PropertiesCache<LovDefinitionProperties>,
}

impl DefinitionLoader {
    /// Creates the loader and reads the application properties, if the
    /// source has them.
    pub fn new<S>(config: LoaderConfig, source: S, registry: ComponentRegistry) -> FormResult<Self>
    where
        S: DefinitionSource + 'static,
    {
        let mut loader = Self {
            config,
            source: Box::new(source),
            application: Arc::new(ApplicationProperties::default()),
            registry,
            forms: PropertiesCache::new(),
            block_definitions: PropertiesCache::new(),
            lov_definitions: PropertiesCache::new(),
        };

        let name = loader.config.definitions.application.clone();
        if loader.source.exists(DefinitionKind::Application, &name) {
            let application = loader.parse_application(&name)?;
            loader.source.configure(&application);
            loader.application = Arc::new(application);
        } else {
            debug!(
                "no {} found, definitions are checked against empty application properties",
                DefinitionKind::Application.file_name(&name)
            );
        }
        Ok(loader)
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn source(&self) -> &dyn DefinitionSource {
        self.source.as_ref()
    }

    pub fn application(&self) -> Arc<ApplicationProperties> {
        Arc::clone(&self.application)
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Raw text of a definition stream.
    pub fn read_definition(&self, kind: DefinitionKind, name: &str) -> FormResult<String> {
        self.source.read(kind, name).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => FormError::new(MessageKey::DefinitionNotFound, [kind.to_string(), name.to_string()]),
            _ => FormError::io(&kind.file_name(name), &err),
        })
    }

    /// Parses a form without touching the cache.
    pub fn parse_form(&self, name: &str) -> FormResult<FormProperties> {
        let started = Instant::now();
        let text = self.read_definition(DefinitionKind::Form, name)?;
        let mut session = ParseSession::new(self, DefinitionKind::Form, name);
        let form = parser::read_form(&mut session, &text)?;
        info!(
            "loaded form {} in {:.2?} ({} blocks, {} lov definitions, {} object groups)",
            name,
            started.elapsed(),
            form.blocks.len(),
            form.lov_definitions.len(),
            form.object_groups.len()
        );
        Ok(form)
    }

    /// Loads a form; when caching is enabled the first successful parse is
    /// shared by every later call.
    pub fn load_form(&self, name: &str) -> FormResult<Arc<FormProperties>> {
        if self.config.cache.enabled {
            self.forms.get_or_try_load(name, || self.parse_form(name))
        } else {
            self.parse_form(name).map(Arc::new)
        }
    }

    /// A reusable block as declared, without an import alias.
    pub fn load_block_definition(&self, name: &str) -> FormResult<Arc<BlockDefinition>> {
        self.block_definitions.get_or_try_load(name, || {
            let text = self.read_definition(DefinitionKind::ReusableBlock, name)?;
            let mut session = ParseSession::new(self, DefinitionKind::ReusableBlock, name);
            parser::read_block_definition(&mut session, &text)
        })
    }

    /// A reusable LOV definition. Always cached: forms importing the same
    /// LOV share one parse.
    pub fn load_lov_definition(&self, name: &str) -> FormResult<Arc<LovDefinitionProperties>> {
        let mut session = ParseSession::new(self, DefinitionKind::ReusableLov, name);
        self.load_lov_definition_in(&mut session)
    }

    /// Loads the reusable LOV definition `session` was opened for. An import
    /// passes a nested session so that a cycle running through other
    /// definitions back to this one is reported against the whole chain.
    pub(crate) fn load_lov_definition_in(
        &self,
        session: &mut ParseSession<'_>,
    ) -> FormResult<Arc<LovDefinitionProperties>> {
        let name = session.name().to_string();
        // разбор вне ячейки ключа: вложенные импорты LOV не ждут друг друга
        self.lov_definitions.get_or_try_publish(&name, || {
            let text = self.read_definition(DefinitionKind::ReusableLov, &name)?;
            let lov = parser::read_lov_definition(session, &text)?;
            debug!("loaded reusable lov definition {}", lov.name);
            Ok(lov)
        })
    }

    pub fn list_forms(&self) -> Vec<String> {
        self.source.list(DefinitionKind::Form)
    }

    /// Drops a cached form so the next load parses it again.
    pub fn invalidate_form(&self, name: &str) -> bool {
        self.forms.invalidate(name)
    }

    pub fn clear_caches(&self) {
        self.forms.clear();
        self.block_definitions.clear();
        self.lov_definitions.clear();
    }

    pub fn cache_stats(&self) -> LoaderStats {
        LoaderStats {
            forms: self.forms.stats(),
            block_definitions: self.block_definitions.stats(),
            lov_definitions: self.lov_definitions.stats(),
        }
    }

    fn parse_application(&self, name: &str) -> FormResult<ApplicationProperties> {
        let text = self.read_definition(DefinitionKind::Application, name)?;
        let mut session = ParseSession::new(self, DefinitionKind::Application, name);
        let application = parser::read_application(&mut session, &text)?;
        info!(
            "loaded application properties {} ({} visual attributes, {} menus)",
            name,
            application.visual_attributes.len(),
            application.menus.len()
        );
        Ok(application)
    }
}

impl std::fmt::Debug for DefinitionLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionLoader")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("stats", &self.cache_stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = r#"<applicationProperties>
        <reusableBlockLocation>shared</reusableBlockLocation>
        <itemRendererList>
            <renderer name="Text" implementation="text.field"/>
        </itemRendererList>
    </applicationProperties>"#;

    fn loader(source: InMemorySource) -> DefinitionLoader {
        DefinitionLoader::new(LoaderConfig::default(), source, ComponentRegistry::new()).unwrap()
    }

    #[test]
    fn test_application_is_read_at_startup() {
        let loader = loader(InMemorySource::new().with(DefinitionKind::Application, "application", APP));
        let app = loader.application();
        assert_eq!(app.reusable_block_location.as_deref(), Some("shared"));
        assert!(app.renderer(crate::model::RendererKind::Item, "Text").is_some());
    }

    #[test]
    fn test_missing_definition() {
        let loader = loader(InMemorySource::new());
        let err = loader.load_form("NOPE").unwrap_err();
        assert_eq!(err.key(), MessageKey::DefinitionNotFound);
        assert_eq!(err.to_string(), "no form definition called NOPE");
    }

    #[test]
    fn test_forms_are_cached_unless_disabled() {
        let source = InMemorySource::new().with(DefinitionKind::Form, "EMPTY", r#"<form name="EMPTY"/>"#);
        let cached = loader(source.clone());
        let first = cached.load_form("EMPTY").unwrap();
        let second = cached.load_form("EMPTY").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cached.cache_stats().forms.hits, 1);

        let mut config = LoaderConfig::default();
        config.cache.enabled = false;
        let uncached = DefinitionLoader::new(config, source, ComponentRegistry::new()).unwrap();
        let first = uncached.load_form("EMPTY").unwrap();
        let second = uncached.load_form("EMPTY").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(uncached.cache_stats().forms.entries, 0);
    }
}
