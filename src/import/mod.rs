/*!
# Reference Import & Merge

Reusable definitions are spliced into the definition that references them
while it is being read:

- a referenced block is parsed from its `.block` file, renamed to the host's
  alias and overlaid with the host's default-value overrides;
- a reusable LOV definition is cloned under a scoped name and every
  reference to it is rewritten;
- an object group contributes blocks, canvases, relations and LOV
  definitions to the host form.

Everything happens synchronously during the host's parse; an import that
cannot be resolved aborts the whole load.
*/

pub mod object_group;
pub mod referenced_block;
pub mod referenced_lov;
pub mod scoped;

pub use object_group::merge_object_group;
pub use referenced_block::import_referenced_block;
pub use referenced_lov::{import_declared_lov, import_property_lov};
pub use scoped::{rewrite_block_item_refs, ScopedName};
