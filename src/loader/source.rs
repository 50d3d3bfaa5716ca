//! Where definition streams come from.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LoaderConfig;
use crate::core::read_definition_file;
use crate::model::ApplicationProperties;

/// Role of a definition stream in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Form,
    ReusableBlock,
    ReusableLov,
    ObjectGroup,
    Application,
}

impl DefinitionKind {
    pub const ALL: [DefinitionKind; 5] = [
        DefinitionKind::Form,
        DefinitionKind::ReusableBlock,
        DefinitionKind::ReusableLov,
        DefinitionKind::ObjectGroup,
        DefinitionKind::Application,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            DefinitionKind::Form => "form",
            DefinitionKind::ReusableBlock => "block",
            DefinitionKind::ReusableLov => "lovdef",
            DefinitionKind::ObjectGroup => "objgroup",
            DefinitionKind::Application => "xml",
        }
    }

    pub fn file_name(self, name: &str) -> String {
        format!("{}.{}", name, self.extension())
    }

    /// Root element of streams of this kind.
    pub fn root_element(self) -> &'static str {
        match self {
            DefinitionKind::Form | DefinitionKind::ObjectGroup => "form",
            DefinitionKind::ReusableBlock => "blockDefinition",
            DefinitionKind::ReusableLov => "lovDefinition",
            DefinitionKind::Application => "applicationProperties",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DefinitionKind::Form => "form",
            DefinitionKind::ReusableBlock => "reusable block",
            DefinitionKind::ReusableLov => "reusable lov",
            DefinitionKind::ObjectGroup => "object group",
            DefinitionKind::Application => "application properties",
        };
        write!(f, "{}", s)
    }
}

/// A store of named definition streams.
pub trait DefinitionSource: Send + Sync {
    fn read(&self, kind: DefinitionKind, name: &str) -> io::Result<String>;

    fn exists(&self, kind: DefinitionKind, name: &str) -> bool;

    /// Names of every definition of `kind`, sorted.
    fn list(&self, kind: DefinitionKind) -> Vec<String>;

    /// Called once the application properties are read; sources may take
    /// reusable-definition locations from them.
    fn configure(&mut self, _application: &ApplicationProperties) {}
}

/// Definitions stored as files, one sub-directory per kind.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    dirs: HashMap<DefinitionKind, PathBuf>,
}

impl FileSystemSource {
    pub fn new(config: &LoaderConfig) -> Self {
        let defs = &config.definitions;
        let mut dirs = HashMap::new();
        dirs.insert(DefinitionKind::Form, config.resolve(&defs.forms));
        dirs.insert(DefinitionKind::ReusableBlock, config.resolve(&defs.blocks));
        dirs.insert(DefinitionKind::ReusableLov, config.resolve(&defs.lov_definitions));
        dirs.insert(DefinitionKind::ObjectGroup, config.resolve(&defs.object_groups));
        dirs.insert(DefinitionKind::Application, defs.root.clone());
        Self { dirs }
    }

    pub fn dir(&self, kind: DefinitionKind) -> Option<&Path> {
        self.dirs.get(&kind).map(PathBuf::as_path)
    }

    pub fn path(&self, kind: DefinitionKind, name: &str) -> Option<PathBuf> {
        self.dir(kind).map(|dir| dir.join(kind.file_name(name)))
    }

    fn set_location(&mut self, kind: DefinitionKind, location: Option<&str>) {
        let Some(location) = location else {
            return;
        };
        let root = self.dirs.get(&DefinitionKind::Application).cloned().unwrap_or_default();
        let dir = root.join(location);
        if !dir.is_dir() {
            warn!("{} location {} does not exist", kind, dir.display());
        }
        debug!("{} definitions are read from {}", kind, dir.display());
        self.dirs.insert(kind, dir);
    }
}

impl DefinitionSource for FileSystemSource {
    fn read(&self, kind: DefinitionKind, name: &str) -> io::Result<String> {
        let path = self
            .path(kind, name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no directory for {}", kind)))?;
        read_definition_file(&path)
    }

    fn exists(&self, kind: DefinitionKind, name: &str) -> bool {
        self.path(kind, name).is_some_and(|p| p.is_file())
    }

    fn list(&self, kind: DefinitionKind) -> Vec<String> {
        let Some(dir) = self.dir(kind) else {
            return Vec::new();
        };
        let mut names: Vec<String> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some(kind.extension()))
            .filter_map(|entry| entry.path().file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    fn configure(&mut self, application: &ApplicationProperties) {
        self.set_location(DefinitionKind::ReusableBlock, application.reusable_block_location.as_deref());
        self.set_location(DefinitionKind::ReusableLov, application.reusable_lov_definition_location.as_deref());
        self.set_location(DefinitionKind::ObjectGroup, application.object_group_location.as_deref());
    }
}

/// Definitions held in memory; used by tests and by hosts that generate
/// definitions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    streams: HashMap<(DefinitionKind, String), String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: DefinitionKind, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(kind, name, text);
        self
    }

    pub fn insert(&mut self, kind: DefinitionKind, name: impl Into<String>, text: impl Into<String>) {
        self.streams.insert((kind, name.into()), text.into());
    }
}

impl DefinitionSource for InMemorySource {
    fn read(&self, kind: DefinitionKind, name: &str) -> io::Result<String> {
        self.streams
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, kind.file_name(name)))
    }

    fn exists(&self, kind: DefinitionKind, name: &str) -> bool {
        self.streams.contains_key(&(kind, name.to_string()))
    }

    fn list(&self, kind: DefinitionKind) -> Vec<String> {
        let mut names: Vec<String> = self
            .streams
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| n.clone())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_system_source_reads_with_bom() {
        let dir = TempDir::new().unwrap();
        let mut config = LoaderConfig::default();
        config.definitions.root = dir.path().to_path_buf();
        fs::create_dir_all(dir.path().join("forms")).unwrap();
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<form name=\"ORDERS\"/>");
        fs::write(dir.path().join("forms").join("ORDERS.form"), bytes).unwrap();
        fs::write(dir.path().join("forms").join("notes.txt"), "ignored").unwrap();

        let source = FileSystemSource::new(&config);
        assert!(source.exists(DefinitionKind::Form, "ORDERS"));
        assert!(!source.exists(DefinitionKind::Form, "notes"));
        assert_eq!(source.read(DefinitionKind::Form, "ORDERS").unwrap(), "<form name=\"ORDERS\"/>");
        assert_eq!(source.list(DefinitionKind::Form), vec!["ORDERS".to_string()]);
        assert_eq!(
            source.read(DefinitionKind::Form, "MISSING").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_locations_from_application_properties() {
        let dir = TempDir::new().unwrap();
        let mut config = LoaderConfig::default();
        config.definitions.root = dir.path().to_path_buf();
        fs::create_dir_all(dir.path().join("shared").join("blocks")).unwrap();
        fs::write(dir.path().join("shared").join("blocks").join("ADDRESS.block"), "<blockDefinition/>").unwrap();

        let mut source = FileSystemSource::new(&config);
        assert!(!source.exists(DefinitionKind::ReusableBlock, "ADDRESS"));
        source.configure(&ApplicationProperties {
            reusable_block_location: Some("shared/blocks".into()),
            ..Default::default()
        });
        assert!(source.exists(DefinitionKind::ReusableBlock, "ADDRESS"));
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new()
            .with(DefinitionKind::Form, "B", "<form/>")
            .with(DefinitionKind::Form, "A", "<form/>")
            .with(DefinitionKind::ReusableBlock, "C", "<blockDefinition/>");
        assert_eq!(source.list(DefinitionKind::Form), vec!["A".to_string(), "B".to_string()]);
        assert!(source.exists(DefinitionKind::ReusableBlock, "C"));
        assert!(source.read(DefinitionKind::ObjectGroup, "A").is_err());
    }
}
