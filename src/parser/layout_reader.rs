//! Readers for the application layout tree.

use super::attrs::{parse_bool, parse_u32, text, unexpected};
use super::extension_reader::ExtensionGroupFrame;
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::{FormError, FormResult, MessageKey};
use crate::model::{ApplicationLayout, LayoutItem, LayoutItemType};

pub struct LayoutFrame {
    layout: ApplicationLayout,
}

impl LayoutFrame {
    pub fn open(_start: &ElementStart) -> FormResult<Self> {
        Ok(Self {
            layout: ApplicationLayout {
                num_cols: 1,
                ..Default::default()
            },
        })
    }
}

impl ElementHandler for LayoutFrame {
    fn owner(&self) -> &str {
        "applicationLayout"
    }

    fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "layoutItem" => Step::delegate(LayoutItemFrame::open(session, start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let layout = &mut self.layout;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "title" => layout.title = text(value),
            "numCols" => layout.num_cols = parse_u32(value, "numCols")?,
            "width" => layout.width = Some(parse_u32(value, "width")?),
            "height" => layout.height = Some(parse_u32(value, "height")?),
            "layoutItemList" => {}
            tag => return Err(unexpected(tag, "applicationLayout")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::LayoutItem(item) => {
                self.layout.items.insert(item, "applicationLayout")?;
                Ok(())
            }
            other => Err(unexpected(other.describe(), "applicationLayout")),
        }
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::Layout(self.layout))
    }
}

/// `<layoutItem type="..." name="...">`; GROUP, SPLIT and TAB items nest.
pub struct LayoutItemFrame {
    item: LayoutItem,
}

impl LayoutItemFrame {
    pub fn open(session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Self> {
        let item_type = LayoutItemType::parse(&start.attrs.required("layoutItem", "type")?)?;
        let name = match start.attrs.string("name") {
            Some(name) => name,
            None => session.generate_name("layout"),
        };
        Ok(Self {
            item: LayoutItem::new(name, item_type),
        })
    }
}

impl ElementHandler for LayoutItemFrame {
    fn owner(&self) -> &str {
        "layoutItem"
    }

    fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "layoutItem" if self.item.item_type.is_container() => {
                Step::delegate(LayoutItemFrame::open(session, start)?)
            }
            "layoutItem" => Err(unexpected("layoutItem", &format!("layoutItem type=\"{}\"", self.item.item_type))),
            "rendererProperties" => Step::delegate(ExtensionGroupFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let item = &mut self.item;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "horizontalSpan" => item.horizontal_span = parse_u32(value, "horizontalSpan")?,
            "verticalSpan" => item.vertical_span = parse_u32(value, "verticalSpan")?,
            "expandHorizontally" => item.expand_horizontally = parse_bool(value, "expandHorizontally")?,
            "expandVertically" => item.expand_vertically = parse_bool(value, "expandVertically")?,
            "hint" => item.hint = text(value),
            "width" => item.width = Some(parse_u32(value, "width")?),
            "height" => item.height = Some(parse_u32(value, "height")?),
            "title" => item.title = text(value),
            "numCols" => item.num_cols = parse_u32(value, "numCols")?,
            "hideMargin" => item.hide_margin = parse_bool(value, "hideMargin")?,
            "orientation" => item.orientation = text(value),
            "tabPosition" => item.tab_position = text(value),
            "rendererName" => item.renderer_name = text(value),
            "layoutItemList" => {}
            tag => return Err(unexpected(tag, "layoutItem")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::LayoutItem(item) => {
                let owner = self.item.name.clone();
                self.item.items.insert(item, &owner)?;
            }
            Parsed::ExtensionGroup(group) => self.item.renderer_properties = group,
            other => return Err(unexpected(other.describe(), "layoutItem")),
        }
        Ok(())
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        if self.item.item_type == LayoutItemType::Component && self.item.renderer_name.is_none() {
            return Err(FormError::new(
                MessageKey::MissingProperty,
                ["layout item", self.item.name.as_str(), "rendererName"],
            ));
        }
        Ok(Parsed::LayoutItem(self.item))
    }
}
