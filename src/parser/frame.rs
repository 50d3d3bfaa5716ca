/*!
# Parser Frames

A frame is the parse state of one open entity element. The driver keeps an
explicit stack of frames; the top frame receives every element start and
end until it either delegates a nested entity to a fresh child frame
(`Step::Delegate`) or its own element closes. A closed child is finished
into a [`Parsed`] value and handed to its parent's `integrate`.

Frames never see their own start or end tag: a child is opened from the
start event by the parent, and the driver pops it on the matching end.
*/

use super::application_reader::ApplicationFrame;
use super::attrs::Attributes;
use super::block_reader::{BlockDefinitionFrame, BlockFrame};
use super::canvas_reader::{CanvasFrame, PageFrame};
use super::extension_reader::{ExtensionGroupFrame, ExtensionListFrame};
use super::form_reader::FormFrame;
use super::item_group_reader::{ItemGroupFrame, ScreenFrame};
use super::item_reader::{ItemFrame, ScreenItemFrame};
use super::layout_reader::{LayoutFrame, LayoutItemFrame};
use super::lov_reader::{LovDefinitionFrame, LovMappingFrame};
use super::menu_reader::{MenuFrame, MenuLeafFrame};
use super::relation_reader::RelationFrame;
use super::session::ParseSession;
use super::visual_reader::VisualAttributeFrame;
use crate::core::{FormError, FormResult};
use crate::model::{
    ApplicationLayout, ApplicationProperties, BlockDefinition, BlockItemProperties, CanvasTree,
    ExtensionPropertyGroup, ExtensionPropertyList, FormProperties, ItemGroupProperties, LayoutItem,
    LovDefinitionProperties, LovMappingProperties, MenuLeafProperties, MenuProperties, PageTree,
    RelationProperties, ScreenItemProperties, ScreenProperties, VisualAttributeProperties,
};

#[derive(Debug, Clone)]
pub struct ElementStart {
    pub tag: String,
    pub attrs: Attributes,
}

#[derive(Debug, Clone)]
pub struct ElementEnd {
    pub tag: String,
    /// Trimmed character data collected directly inside the element.
    pub text: String,
}

pub enum Step {
    Continue,
    Delegate(Frame),
}

impl Step {
    pub fn delegate(frame: impl Into<Frame>) -> FormResult<Step> {
        Ok(Step::Delegate(frame.into()))
    }
}

/// Finished result of a frame.
#[derive(Debug)]
pub enum Parsed {
    Form(Box<FormProperties>),
    BlockDefinition(Box<BlockDefinition>),
    /// A block together with the LOV definitions an import brought along.
    Block(Box<BlockDefinition>),
    Item(BlockItemProperties),
    Screen(ScreenProperties),
    ItemGroup(ItemGroupProperties),
    ScreenItem(ScreenItemProperties),
    Canvas(CanvasTree),
    /// A page and the popups declared inside it.
    Page(PageTree, Vec<CanvasTree>),
    LovDefinition(Box<LovDefinitionProperties>),
    LovMapping(LovMappingProperties),
    Relation(RelationProperties),
    VisualAttribute(VisualAttributeProperties),
    Menu(MenuProperties),
    MenuLeaf(MenuLeafProperties),
    Layout(ApplicationLayout),
    LayoutItem(LayoutItem),
    ExtensionGroup(ExtensionPropertyGroup),
    ExtensionList(ExtensionPropertyList),
    Application(Box<ApplicationProperties>),
}

impl Parsed {
    pub fn describe(&self) -> &'static str {
        match self {
            Parsed::Form(_) => "form",
            Parsed::BlockDefinition(_) => "block definition",
            Parsed::Block(_) => "block",
            Parsed::Item(_) => "item",
            Parsed::Screen(_) => "screen",
            Parsed::ItemGroup(_) => "item group",
            Parsed::ScreenItem(_) => "screen item",
            Parsed::Canvas(_) => "canvas",
            Parsed::Page(..) => "page",
            Parsed::LovDefinition(_) => "lov definition",
            Parsed::LovMapping(_) => "lov mapping",
            Parsed::Relation(_) => "relation",
            Parsed::VisualAttribute(_) => "visual attribute",
            Parsed::Menu(_) => "menu",
            Parsed::MenuLeaf(_) => "menu leaf",
            Parsed::Layout(_) => "layout",
            Parsed::LayoutItem(_) => "layout item",
            Parsed::ExtensionGroup(_) => "property group",
            Parsed::ExtensionList(_) => "property list",
            Parsed::Application(_) => "application properties",
        }
    }
}

/// Behaviour of one frame kind.
pub trait ElementHandler {
    /// Element name used in error messages.
    fn owner(&self) -> &str;

    fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step>;

    fn on_end(&mut self, session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()>;

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        Err(FormError::malformed(format!(
            "a {} cannot be integrated into <{}>",
            child.describe(),
            self.owner()
        )))
    }

    fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed>;
}

macro_rules! frames {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Tagged parse state; one variant per entity reader.
        pub enum Frame {
            $($variant($ty)),*
        }

        impl Frame {
            pub fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
                match self {
                    $(Frame::$variant(f) => f.on_start(session, start)),*
                }
            }

            pub fn on_end(&mut self, session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
                match self {
                    $(Frame::$variant(f) => f.on_end(session, end)),*
                }
            }

            pub fn integrate(&mut self, session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
                match self {
                    $(Frame::$variant(f) => f.integrate(session, child)),*
                }
            }

            pub fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
                match self {
                    $(Frame::$variant(f) => f.finish(session)),*
                }
            }
        }

        $(
            impl From<$ty> for Frame {
                fn from(frame: $ty) -> Self {
                    Frame::$variant(frame)
                }
            }
        )*
    };
}

frames! {
    Form(FormFrame),
    BlockDefinition(BlockDefinitionFrame),
    Block(BlockFrame),
    Item(ItemFrame),
    Screen(ScreenFrame),
    ItemGroup(ItemGroupFrame),
    ScreenItem(ScreenItemFrame),
    Canvas(CanvasFrame),
    Page(PageFrame),
    LovDefinition(LovDefinitionFrame),
    LovMapping(LovMappingFrame),
    Relation(RelationFrame),
    VisualAttribute(VisualAttributeFrame),
    Menu(MenuFrame),
    MenuLeaf(MenuLeafFrame),
    Layout(LayoutFrame),
    LayoutItem(LayoutItemFrame),
    ExtensionGroup(ExtensionGroupFrame),
    ExtensionList(ExtensionListFrame),
    Application(ApplicationFrame),
}
