/*!
# Definition Parser

Streaming readers for the XML definition formats. A document is read once,
front to back, with `quick_xml`; each entity element (form, canvas, block,
item, LOV definition, ...) is handled by its own frame on an explicit
stack, so nesting depth is limited only by memory.

References to other definitions are resolved while reading: a referenced
block is imported when its `<block>` closes, an object group is merged when
its `<objectGroup>` is listed, a referenced LOV definition is pulled in
from the loader's cache. All of it goes through the [`ParseSession`].

## Usage

```rust,ignore
use formdef::loader::{DefinitionKind, DefinitionLoader};
use formdef::parser::{self, ParseSession};

let mut session = ParseSession::new(&loader, DefinitionKind::Form, "ORDERS");
let form = parser::read_form(&mut session, &text)?;
```
*/

mod application_reader;
mod attrs;
mod block_reader;
mod canvas_reader;
mod driver;
mod extension_reader;
mod form_reader;
mod frame;
mod item_group_reader;
mod item_reader;
mod layout_reader;
mod lov_reader;
mod menu_reader;
mod relation_reader;
mod session;
mod visual_reader;

pub use session::ParseSession;

use crate::core::{FormError, FormResult};
use crate::model::{ApplicationProperties, BlockDefinition, FormProperties, LovDefinitionProperties};
use application_reader::ApplicationFrame;
use block_reader::BlockDefinitionFrame;
use form_reader::FormFrame;
use frame::{Frame, Parsed};
use lov_reader::LovDefinitionFrame;

/// Reads a `.form` (or `.objgroup`) stream.
pub fn read_form(session: &mut ParseSession<'_>, text: &str) -> FormResult<FormProperties> {
    let parsed = driver::drive(session, text, "form", |session, start| {
        Ok(Frame::from(FormFrame::open(session, start)?))
    })?;
    match parsed {
        Parsed::Form(form) => Ok(*form),
        other => Err(unexpected_result("form", &other)),
    }
}

/// Reads a `.block` stream: one block plus the LOV definitions it carries.
pub fn read_block_definition(session: &mut ParseSession<'_>, text: &str) -> FormResult<BlockDefinition> {
    let parsed = driver::drive(session, text, "blockDefinition", |_, start| {
        Ok(Frame::from(BlockDefinitionFrame::open(start)?))
    })?;
    match parsed {
        Parsed::BlockDefinition(definition) => Ok(*definition),
        other => Err(unexpected_result("blockDefinition", &other)),
    }
}

/// Reads a `.lovdef` stream.
pub fn read_lov_definition(session: &mut ParseSession<'_>, text: &str) -> FormResult<LovDefinitionProperties> {
    let parsed = driver::drive(session, text, "lovDefinition", |session, start| {
        Ok(Frame::from(LovDefinitionFrame::open_root(start, session.name())?))
    })?;
    match parsed {
        Parsed::LovDefinition(lov) => {
            let mut lov = *lov;
            // LOV в своём файле не может быть ссылкой на другой LOV
            lov.is_referenced = false;
            lov.referenced_lov_definition_name = None;
            Ok(lov)
        }
        other => Err(unexpected_result("lovDefinition", &other)),
    }
}

/// Reads the application-properties stream.
pub fn read_application(session: &mut ParseSession<'_>, text: &str) -> FormResult<ApplicationProperties> {
    let parsed = driver::drive(session, text, "applicationProperties", |_, start| {
        Ok(Frame::from(ApplicationFrame::open(start)?))
    })?;
    match parsed {
        Parsed::Application(app) => Ok(*app),
        other => Err(unexpected_result("applicationProperties", &other)),
    }
}

fn unexpected_result(root: &str, parsed: &Parsed) -> FormError {
    FormError::malformed(format!("<{}> produced a {}", root, parsed.describe()))
}
