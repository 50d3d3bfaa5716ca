//! Reader for `<visualAttribute name="...">` declarations.

use super::attrs::{parse_u32, text, unexpected};
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::FormResult;
use crate::model::{Color, VisualAttributeProperties};

pub struct VisualAttributeFrame {
    attribute: VisualAttributeProperties,
}

impl VisualAttributeFrame {
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        let name = start.attrs.required("visualAttribute", "name")?;
        Ok(Self {
            attribute: VisualAttributeProperties::new(name),
        })
    }
}

impl ElementHandler for VisualAttributeFrame {
    fn owner(&self) -> &str {
        "visualAttribute"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, _start: &ElementStart) -> FormResult<Step> {
        Ok(Step::Continue)
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let va = &mut self.attribute;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "fontName" => va.font_name = text(value),
            "fontSize" => va.font_size = Some(parse_u32(value, "fontSize")?),
            "fontStyle" => va.font_style = text(value),
            "fontWeight" => va.font_weight = text(value),
            "foregroundColor" => va.foreground_color = text(value).map(|c| Color::parse(&c)).transpose()?,
            "backgroundColor" => va.background_color = text(value).map(|c| Color::parse(&c)).transpose()?,
            "markupType" => va.markup_type = text(value),
            tag => return Err(unexpected(tag, "visualAttribute")),
        }
        Ok(())
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::VisualAttribute(self.attribute))
    }
}
