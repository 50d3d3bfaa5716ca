/*!
# Property Graph

Typed, owned property records produced by the definition readers. A
[`FormProperties`] owns its blocks, canvases (through a [`CanvasArena`]),
relations and LOV definitions; a reusable block definition owns its block
and the LOV definitions declared next to it.

[`PropertyNode`] is a borrowed, tagged view over any node of the graph, used
by consumers that walk the graph generically (the `inspect` command, the
renderer layer).
*/

pub mod application;
pub mod block;
pub mod canvas;
pub mod container;
pub mod extension;
pub mod form;
pub mod item;
pub mod layout;
pub mod lov;
pub mod menu;
pub mod relation;
pub mod visual;

pub use application::{ApplicationParameter, ApplicationProperties, RendererDefinition, RendererKind};
pub use block::{BlockDefinition, BlockProperties};
pub use canvas::{
    CanvasArena, CanvasGeometry, CanvasId, CanvasPage, CanvasProperties, CanvasTree, CanvasType, PageKind, PageTree,
};
pub use container::{Named, NamedContainer};
pub use extension::{
    ExtensionProperty, ExtensionPropertyGroup, ExtensionPropertyList, ExtensionPropertyListEntry, PropertyKind,
};
pub use form::{FormParameter, FormProperties};
pub use item::{BlockItemProperties, ItemGroupProperties, ScreenItemProperties, ScreenProperties, ScreenType};
pub use layout::{ApplicationLayout, LayoutItem, LayoutItemType};
pub use lov::{LovDefinitionProperties, LovItemMap, LovMappingProperties};
pub use menu::{MenuLeafProperties, MenuLeafType, MenuProperties};
pub use relation::{BlockId, RelationJoin, RelationProperties};
pub use visual::{Color, VisualAttributeProperties};

/// Item variants: the shared block item and its per-screen appearances.
#[derive(Debug, Clone, Copy)]
pub enum ItemNode<'a> {
    Block(&'a BlockItemProperties),
    Screen(&'a ScreenItemProperties),
}

impl<'a> ItemNode<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            ItemNode::Block(i) => &i.name,
            ItemNode::Screen(i) => &i.name,
        }
    }

    /// `None` for the shared block item.
    pub fn screen(&self) -> Option<ScreenType> {
        match *self {
            ItemNode::Block(_) => None,
            ItemNode::Screen(i) => Some(i.screen),
        }
    }
}

/// Borrowed view of one node in the property graph.
#[derive(Debug, Clone, Copy)]
pub enum PropertyNode<'a> {
    Form(&'a FormProperties),
    Block(&'a BlockProperties),
    Canvas(&'a CanvasProperties),
    Item(ItemNode<'a>),
    LovDefinition(&'a LovDefinitionProperties),
    LovMapping(&'a LovMappingProperties),
    Relation(&'a RelationProperties),
    MenuLeaf(&'a MenuLeafProperties),
    ExtensionGroup(&'a ExtensionPropertyGroup),
    ExtensionList(&'a ExtensionPropertyList),
}

impl<'a> PropertyNode<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            PropertyNode::Form(n) => &n.name,
            PropertyNode::Block(n) => &n.name,
            PropertyNode::Canvas(n) => &n.name,
            PropertyNode::Item(n) => n.name(),
            PropertyNode::LovDefinition(n) => &n.name,
            PropertyNode::LovMapping(n) => &n.name,
            PropertyNode::Relation(n) => &n.name,
            PropertyNode::MenuLeaf(n) => &n.name,
            PropertyNode::ExtensionGroup(n) => &n.name,
            PropertyNode::ExtensionList(n) => &n.name,
        }
    }

    /// Short tag including the sub-type where a node has one, e.g.
    /// `canvas TAB` or `item query`.
    pub fn tag(&self) -> String {
        match self {
            PropertyNode::Form(_) => "form".to_string(),
            PropertyNode::Block(_) => "block".to_string(),
            PropertyNode::Canvas(c) => format!("canvas {}", c.canvas_type),
            PropertyNode::Item(ItemNode::Block(_)) => "item".to_string(),
            PropertyNode::Item(ItemNode::Screen(i)) => format!("item {}", i.screen),
            PropertyNode::LovDefinition(_) => "lov definition".to_string(),
            PropertyNode::LovMapping(_) => "lov mapping".to_string(),
            PropertyNode::Relation(_) => "relation".to_string(),
            PropertyNode::MenuLeaf(l) => format!("leaf {}", l.leaf_type),
            PropertyNode::ExtensionGroup(_) => "property group".to_string(),
            PropertyNode::ExtensionList(_) => "property list".to_string(),
        }
    }

    /// Direct children in declaration order. Canvas children are resolved
    /// through `form`'s arena, so a canvas node needs its form.
    pub fn children(&self, form: Option<&'a FormProperties>) -> Vec<PropertyNode<'a>> {
        let mut out = Vec::new();
        match *self {
            PropertyNode::Form(f) => {
                out.extend(f.canvases.roots().map(PropertyNode::Canvas));
                out.extend(f.canvases.popups().map(PropertyNode::Canvas));
                out.extend(f.lov_definitions.iter().map(PropertyNode::LovDefinition));
                out.extend(f.blocks.iter().map(PropertyNode::Block));
                out.extend(f.relations.iter().map(PropertyNode::Relation));
                push_group(&mut out, &f.renderer_properties);
            }
            PropertyNode::Block(b) => {
                out.extend(b.items.iter().map(|i| PropertyNode::Item(ItemNode::Block(i))));
                for screen in ScreenType::ALL {
                    out.extend(
                        b.screen(screen)
                            .all_items()
                            .into_iter()
                            .map(|i| PropertyNode::Item(ItemNode::Screen(i))),
                    );
                }
                out.extend(b.lov_mappings.iter().map(PropertyNode::LovMapping));
                push_group(&mut out, &b.renderer_properties);
            }
            PropertyNode::Canvas(c) => {
                if let Some(form) = form {
                    if let Some(id) = form.canvases.id_of(&c.name) {
                        out.extend(form.canvases.children(id).into_iter().map(PropertyNode::Canvas));
                    }
                }
            }
            PropertyNode::Item(ItemNode::Block(i)) => push_group(&mut out, &i.renderer_properties),
            PropertyNode::Item(ItemNode::Screen(i)) => push_group(&mut out, &i.renderer_properties),
            PropertyNode::LovDefinition(l) => {
                if let Some(block) = &l.block {
                    out.push(PropertyNode::Block(block));
                }
                push_group(&mut out, &l.renderer_properties);
            }
            PropertyNode::MenuLeaf(l) => out.extend(l.leaves.iter().map(PropertyNode::MenuLeaf)),
            PropertyNode::ExtensionGroup(g) => {
                out.extend(g.groups.iter().map(PropertyNode::ExtensionGroup));
                out.extend(g.lists.iter().map(PropertyNode::ExtensionList));
            }
            PropertyNode::LovMapping(_) | PropertyNode::Relation(_) | PropertyNode::ExtensionList(_) => {}
        }
        out
    }
}

fn push_group<'a>(out: &mut Vec<PropertyNode<'a>>, group: &'a ExtensionPropertyGroup) {
    if !group.is_empty() {
        out.push(PropertyNode::ExtensionGroup(group));
    }
}
