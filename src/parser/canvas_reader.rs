/*!
# Canvas Readers

A canvas element opens a `CanvasFrame`; every `<canvas>` nested inside it
opens a fresh child frame. A finished child is routed by its declared type
(popup, group, split, other content). Pages of TAB/STACKED/DRAWER canvases
are read by `PageFrame`, whose canvases point back at the owning canvas and
page by name.
*/

use super::attrs::{parse_bool, parse_u32, text, unexpected};
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::{FormError, FormResult, MessageKey};
use crate::model::{CanvasPage, CanvasProperties, CanvasTree, CanvasType, PageKind, PageTree};

pub struct CanvasFrame {
    tree: CanvasTree,
}

impl CanvasFrame {
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        let name = start.attrs.required("canvas", "name")?;
        let canvas_type = CanvasType::parse(start.attrs.get("type").unwrap_or_default())?;
        Ok(Self {
            tree: CanvasTree::new(CanvasProperties::new(name, canvas_type)),
        })
    }
}

impl ElementHandler for CanvasFrame {
    fn owner(&self) -> &str {
        "canvas"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        if start.tag == "canvas" {
            return Step::delegate(CanvasFrame::open(start)?);
        }
        if let Some(kind) = PageKind::from_element(&start.tag) {
            let canvas = &self.tree.canvas;
            if canvas.canvas_type != kind.owner_type() {
                return Err(FormError::new(
                    MessageKey::InvalidCanvasPlacement,
                    [kind.element().to_string(), canvas.canvas_type.to_string(), canvas.name.clone()],
                ));
            }
            return Step::delegate(PageFrame::open(start, kind)?);
        }
        Ok(Step::Continue)
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let c = &mut self.tree.canvas;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "width" => c.geometry.width = parse_u32(value, "width")?,
            "height" => c.geometry.height = parse_u32(value, "height")?,
            "horizontalSpan" => c.geometry.horizontal_span = parse_u32(value, "horizontalSpan")?,
            "verticalSpan" => c.geometry.vertical_span = parse_u32(value, "verticalSpan")?,
            "expandHorizontally" => c.geometry.expand_horizontally = parse_bool(value, "expandHorizontally")?,
            "expandVertically" => c.geometry.expand_vertically = parse_bool(value, "expandVertically")?,
            "numCols" => c.num_cols = parse_u32(value, "numCols")?,
            "displayGroupFrame" => c.display_group_frame = parse_bool(value, "displayGroupFrame")?,
            "groupFrameTitle" => c.group_frame_title = text(value),
            "tabPosition" => c.tab_position = text(value),
            "drawerPosition" => c.drawer_position = text(value),
            "splitOrientation" => c.split_orientation = text(value),
            "initialStackedPageName" => c.initial_stacked_page_name = text(value),
            "popupPageTitle" => c.popup_page_title = text(value),
            "buttonOneText" => c.button_one_text = text(value),
            "buttonTwoText" => c.button_two_text = text(value),
            "buttonThreeText" => c.button_three_text = text(value),
            "canvasList" | "tabPageList" | "stackedPageList" | "drawerPageList" => {}
            tag => return Err(unexpected(tag, "canvas")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::Canvas(child) => self.tree.attach_child(child),
            Parsed::Page(mut page, popups) => {
                if self.tree.pages.iter().any(|p| p.page.name == page.page.name) {
                    return Err(FormError::duplicate("page", &page.page.name, &self.tree.canvas.name));
                }
                for canvas in &mut page.canvases {
                    canvas.canvas.content_canvas_name = Some(self.tree.canvas.name.clone());
                }
                self.tree.popups.extend(popups);
                self.tree.pages.push(page);
            }
            other => return Err(unexpected(other.describe(), "canvas")),
        }
        Ok(())
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        let canvas = &self.tree.canvas;
        if canvas.canvas_type == CanvasType::Stacked {
            if let Some(initial) = canvas.initial_stacked_page_name.as_deref() {
                if !self.tree.pages.iter().any(|p| p.page.name == initial) {
                    return Err(FormError::new(MessageKey::StackedPageNotFound, [initial, canvas.name.as_str()]));
                }
            }
        }
        Ok(Parsed::Canvas(self.tree))
    }
}

/// `<tabPage>`, `<stackedPage>` or `<drawerPage>`.
pub struct PageFrame {
    page: PageTree,
    popups: Vec<CanvasTree>,
}

impl PageFrame {
    pub fn open(start: &ElementStart, kind: PageKind) -> FormResult<Self> {
        let name = start.attrs.required(kind.element(), "name")?;
        Ok(Self {
            page: PageTree {
                page: CanvasPage::new(name, kind),
                canvases: Vec::new(),
            },
            popups: Vec::new(),
        })
    }
}

impl ElementHandler for PageFrame {
    fn owner(&self) -> &str {
        self.page.page.kind.element()
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "canvas" => Step::delegate(CanvasFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let page = &mut self.page.page;
        match end.tag.as_str() {
            "pageTitle" => page.title = text(&end.text),
            "enabled" => page.enabled = parse_bool(&end.text, "enabled")?,
            "visible" => page.visible = parse_bool(&end.text, "visible")?,
            "drawerWidth" => page.drawer_width = Some(parse_u32(&end.text, "drawerWidth")?),
            "canvasList" => {}
            tag => return Err(unexpected(tag, page.kind.element())),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::Canvas(tree) if tree.canvas.canvas_type == CanvasType::Popup => self.popups.push(tree),
            Parsed::Canvas(mut tree) => {
                tree.canvas.content_canvas_page_name = Some(self.page.page.name.clone());
                self.page.canvases.push(tree);
            }
            other => return Err(unexpected(other.describe(), self.page.page.kind.element())),
        }
        Ok(())
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::Page(self.page, self.popups))
    }
}
