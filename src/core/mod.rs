/*!
# Core Module

Error handling, source positions and file helpers shared by every reader.
*/

pub mod errors;
pub mod fs_utils;
pub mod position;

pub use errors::{FormError, FormResult, MessageKey, SourceLocation};
pub use fs_utils::read_definition_file;
pub use position::{LineIndex, Position};
