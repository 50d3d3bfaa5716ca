/*!
# Screen & Item Group Readers

One reader serves all four screens. The screen a frame was opened for
decides which item variant is built and is passed down to every nested
group, so main/query/insert/update layouts share the same recursive
algorithm.
*/

use super::attrs::{parse_bool, parse_u32, text, unexpected};
use super::extension_reader::ExtensionGroupFrame;
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::item_reader::ScreenItemFrame;
use super::session::ParseSession;
use crate::core::FormResult;
use crate::model::{ItemGroupProperties, ScreenProperties, ScreenType};

/// `<mainScreen>`, `<queryScreen>`, `<insertScreen>` or `<updateScreen>`.
pub struct ScreenFrame {
    screen: ScreenProperties,
    tag: &'static str,
}

impl ScreenFrame {
    pub fn open(screen: ScreenType) -> Self {
        Self {
            screen: ScreenProperties::new(screen),
            tag: screen.element(),
        }
    }
}

impl ElementHandler for ScreenFrame {
    fn owner(&self) -> &str {
        self.tag
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "itemGroup" => Step::delegate(ItemGroupFrame::open(start, self.screen.screen)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        match end.tag.as_str() {
            "width" => self.screen.width = Some(parse_u32(&end.text, "width")?),
            "height" => self.screen.height = Some(parse_u32(&end.text, "height")?),
            "numCols" => self.screen.num_cols = parse_u32(&end.text, "numCols")?,
            "itemGroupList" => {}
            tag => return Err(unexpected(tag, self.tag)),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::ItemGroup(group) => {
                self.screen.item_groups.insert(group, self.tag)?;
                Ok(())
            }
            other => Err(unexpected(other.describe(), self.tag)),
        }
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::Screen(self.screen))
    }
}

/// `<itemGroup name="...">`, recursively.
pub struct ItemGroupFrame {
    group: ItemGroupProperties,
}

impl ItemGroupFrame {
    pub fn open(start: &ElementStart, screen: ScreenType) -> FormResult<Self> {
        let name = start.attrs.required("itemGroup", "name")?;
        Ok(Self {
            group: ItemGroupProperties::new(screen, name),
        })
    }
}

impl ElementHandler for ItemGroupFrame {
    fn owner(&self) -> &str {
        "itemGroup"
    }

    fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        let screen = self.group.screen;
        match start.tag.as_str() {
            "itemGroup" => Step::delegate(ItemGroupFrame::open(start, screen)?),
            "item" => Step::delegate(ScreenItemFrame::open(session, start, screen)?),
            "rendererProperties" => Step::delegate(ExtensionGroupFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let g = &mut self.group;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "numCols" => g.num_cols = parse_u32(value, "numCols")?,
            "width" => g.width = Some(parse_u32(value, "width")?),
            "height" => g.height = Some(parse_u32(value, "height")?),
            "horizontalSpan" => g.horizontal_span = parse_u32(value, "horizontalSpan")?,
            "verticalSpan" => g.vertical_span = parse_u32(value, "verticalSpan")?,
            "expandHorizontally" => g.expand_horizontally = parse_bool(value, "expandHorizontally")?,
            "expandVertically" => g.expand_vertically = parse_bool(value, "expandVertically")?,
            "displayGroupFrame" => g.display_group_frame = parse_bool(value, "displayGroupFrame")?,
            "frameTitle" => g.frame_title = text(value),
            "separator" => g.separator = parse_bool(value, "separator")?,
            "separatorOrientation" => g.separator_orientation = text(value),
            "separatorLineStyle" => g.separator_line_style = text(value),
            "horizontalAlignment" => g.horizontal_alignment = text(value),
            "verticalAlignment" => g.vertical_alignment = text(value),
            "itemList" | "itemGroupList" => {}
            tag => return Err(unexpected(tag, "itemGroup")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        let owner = self.group.name.clone();
        match child {
            Parsed::ScreenItem(item) => {
                self.group.items.insert(item, &owner)?;
            }
            Parsed::ItemGroup(group) => {
                self.group.groups.insert(group, &owner)?;
            }
            Parsed::ExtensionGroup(properties) => self.group.renderer_properties = properties,
            other => return Err(unexpected(other.describe(), "itemGroup")),
        }
        Ok(())
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::ItemGroup(self.group))
    }
}
