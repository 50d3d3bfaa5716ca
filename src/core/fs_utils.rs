//! File system utility helpers (BOM-aware readers, etc.)
use std::fs;
use std::path::Path;

/// Read a definition file as UTF-8 text, stripping UTF-8 BOM if present.
pub fn read_definition_file(path: &Path) -> std::io::Result<String> {
    let content = fs::read_to_string(path)?;
    match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}
