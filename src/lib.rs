/*!
# Formdef

Loader for declarative form definitions. A form is described in XML: its
canvases (window regions and pages), data blocks with items laid out on
four screens, lists of values (LOVs), master/detail relations and
renderer-specific extension properties. The loader reads these streams,
imports reusable blocks and LOV definitions, merges object groups and
returns a validated, fully resolved property graph.

## Architecture

```text
formdef
├── core      - FormError (message catalog), source positions, file helpers
├── model     - property graph: form, canvas arena, blocks, items, LOVs, ...
├── parser    - streaming quick-xml readers on an explicit frame stack
├── import    - referenced blocks, scoped LOV imports, object-group merge
├── loader    - DefinitionLoader, definition sources, publish-once caches
├── registry  - symbolic component names -> implementations
├── binding   - item <-> data-object field tables
├── config    - formdef.toml
└── cli_common - logging and output helpers of the `formdef` binary
```

## Usage

```rust,ignore
use formdef::{ComponentRegistry, DefinitionLoader, FileSystemSource, LoaderConfig};

let config = LoaderConfig::discover(".")?;
let loader = DefinitionLoader::new(config.clone(), FileSystemSource::new(&config), ComponentRegistry::new())?;

let form = loader.load_form("ORDERS")?;
for block in form.blocks_on_canvas("MAIN") {
    println!("{} ({} items)", block.name, block.items.len());
}
```
*/

pub mod binding;
pub mod cli_common;
pub mod config;
pub mod core;
pub mod import;
pub mod loader;
pub mod model;
pub mod parser;
pub mod registry;

pub use binding::{BindingTable, FieldValue};
pub use config::LoaderConfig;
pub use core::{FormError, FormResult, MessageKey, Position, SourceLocation};
pub use loader::{DefinitionKind, DefinitionLoader, DefinitionSource, FileSystemSource, InMemorySource};
pub use model::{
    ApplicationProperties, BlockProperties, CanvasProperties, FormProperties, LovDefinitionProperties, PropertyNode,
};
pub use registry::{ComponentKind, ComponentRegistry};
