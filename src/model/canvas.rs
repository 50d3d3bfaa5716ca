/*!
# Canvas Properties

Canvases are kept in an arena owned by the form. Nodes refer to each other
through [`CanvasId`] handles only: a child knows its parent canvas id and
the names of the canvas/page it sits in; a parent lists its children per
slot (group contents, split contents, plain content children, pages).

Readers build owned [`CanvasTree`] values; the form flattens a finished tree
into its arena in one step, which is also where form-wide name uniqueness is
enforced.
*/

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::{FormError, FormResult, MessageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CanvasType {
    #[default]
    Content,
    Popup,
    Group,
    Split,
    Tab,
    Stacked,
    Drawer,
}

impl CanvasType {
    pub fn parse(value: &str) -> FormResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "" | "CONTENT" => Ok(CanvasType::Content),
            "POPUP" => Ok(CanvasType::Popup),
            "GROUP" => Ok(CanvasType::Group),
            "SPLIT" => Ok(CanvasType::Split),
            "TAB" => Ok(CanvasType::Tab),
            "STACKED" => Ok(CanvasType::Stacked),
            "DRAWER" => Ok(CanvasType::Drawer),
            _ => Err(FormError::invalid_value(
                value,
                "canvas type",
                "CONTENT, POPUP, GROUP, SPLIT, TAB, STACKED or DRAWER",
            )),
        }
    }
}

impl fmt::Display for CanvasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CanvasType::Content => "CONTENT",
            CanvasType::Popup => "POPUP",
            CanvasType::Group => "GROUP",
            CanvasType::Split => "SPLIT",
            CanvasType::Tab => "TAB",
            CanvasType::Stacked => "STACKED",
            CanvasType::Drawer => "DRAWER",
        };
        write!(f, "{}", s)
    }
}

/// Kind of page a TAB/STACKED/DRAWER canvas is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    Tab,
    Stacked,
    Drawer,
}

impl PageKind {
    pub fn element(self) -> &'static str {
        match self {
            PageKind::Tab => "tabPage",
            PageKind::Stacked => "stackedPage",
            PageKind::Drawer => "drawerPage",
        }
    }

    pub fn from_element(tag: &str) -> Option<Self> {
        match tag {
            "tabPage" => Some(PageKind::Tab),
            "stackedPage" => Some(PageKind::Stacked),
            "drawerPage" => Some(PageKind::Drawer),
            _ => None,
        }
    }

    /// Canvas type a page of this kind must live in.
    pub fn owner_type(self) -> CanvasType {
        match self {
            PageKind::Tab => CanvasType::Tab,
            PageKind::Stacked => CanvasType::Stacked,
            PageKind::Drawer => CanvasType::Drawer,
        }
    }
}

/// Size/span/expand settings. These are what a host keeps when an object
/// group replaces one of its canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
    pub horizontal_span: u32,
    pub vertical_span: u32,
    pub expand_horizontally: bool,
    pub expand_vertically: bool,
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            horizontal_span: 1,
            vertical_span: 1,
            expand_horizontally: true,
            expand_vertically: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasPage {
    pub name: String,
    pub kind: PageKind,
    pub title: Option<String>,
    pub enabled: bool,
    pub visible: bool,
    pub drawer_width: Option<u32>,
    pub canvases: Vec<CanvasId>,
}

impl CanvasPage {
    pub fn new(name: impl Into<String>, kind: PageKind) -> Self {
        Self {
            name: name.into(),
            kind,
            title: None,
            enabled: true,
            visible: true,
            drawer_width: None,
            canvases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasProperties {
    pub name: String,
    pub canvas_type: CanvasType,
    pub geometry: CanvasGeometry,
    pub num_cols: u32,
    pub display_group_frame: bool,
    pub group_frame_title: Option<String>,
    pub tab_position: Option<String>,
    pub drawer_position: Option<String>,
    pub split_orientation: Option<String>,
    pub initial_stacked_page_name: Option<String>,
    pub popup_page_title: Option<String>,
    pub button_one_text: Option<String>,
    pub button_two_text: Option<String>,
    pub button_three_text: Option<String>,
    /// Canvas this canvas is displayed in.
    pub content_canvas_name: Option<String>,
    /// Page of the content canvas this canvas is displayed on.
    pub content_canvas_page_name: Option<String>,
    pub parent: Option<CanvasId>,
    pub group_canvases: Vec<CanvasId>,
    pub split_canvases: Vec<CanvasId>,
    pub content_canvases: Vec<CanvasId>,
    pub pages: Vec<CanvasPage>,
}

impl CanvasProperties {
    pub fn new(name: impl Into<String>, canvas_type: CanvasType) -> Self {
        Self {
            name: name.into(),
            canvas_type,
            geometry: CanvasGeometry::default(),
            num_cols: 1,
            display_group_frame: false,
            group_frame_title: None,
            tab_position: None,
            drawer_position: None,
            split_orientation: None,
            initial_stacked_page_name: None,
            popup_page_title: None,
            button_one_text: None,
            button_two_text: None,
            button_three_text: None,
            content_canvas_name: None,
            content_canvas_page_name: None,
            parent: None,
            group_canvases: Vec::new(),
            split_canvases: Vec::new(),
            content_canvases: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn page(&self, name: &str) -> Option<&CanvasPage> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Direct children over every slot.
    pub fn child_ids(&self) -> impl Iterator<Item = CanvasId> + '_ {
        self.group_canvases
            .iter()
            .chain(self.split_canvases.iter())
            .chain(self.content_canvases.iter())
            .chain(self.pages.iter().flat_map(|p| p.canvases.iter()))
            .copied()
    }

    fn clear_links(&mut self) {
        self.parent = None;
        self.group_canvases.clear();
        self.split_canvases.clear();
        self.content_canvases.clear();
        for page in &mut self.pages {
            page.canvases.clear();
        }
    }
}

/// Page with its owned child trees, as produced by a page reader.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTree {
    pub page: CanvasPage,
    pub canvases: Vec<CanvasTree>,
}

/// A canvas with its owned children, as produced by a canvas reader.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTree {
    pub canvas: CanvasProperties,
    pub group: Vec<CanvasTree>,
    pub split: Vec<CanvasTree>,
    pub content: Vec<CanvasTree>,
    pub pages: Vec<PageTree>,
    /// Popups declared inside this canvas; they belong to the form, not to
    /// the canvas, and are lifted out when the tree is inserted.
    pub popups: Vec<CanvasTree>,
}

impl CanvasTree {
    pub fn new(canvas: CanvasProperties) -> Self {
        Self {
            canvas,
            group: Vec::new(),
            split: Vec::new(),
            content: Vec::new(),
            pages: Vec::new(),
            popups: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.canvas.name
    }

    /// Routes a finished child into the slot its declared type selects.
    pub fn attach_child(&mut self, mut child: CanvasTree) {
        match child.canvas.canvas_type {
            CanvasType::Popup => self.popups.push(child),
            CanvasType::Group => {
                child.canvas.content_canvas_name = Some(self.canvas.name.clone());
                self.group.push(child);
            }
            CanvasType::Split => {
                child.canvas.content_canvas_name = Some(self.canvas.name.clone());
                self.split.push(child);
            }
            _ => {
                child.canvas.content_canvas_name = Some(self.canvas.name.clone());
                self.content.push(child);
            }
        }
    }

    /// Every canvas name in the tree (popups included).
    pub fn names(&self) -> Vec<&str> {
        let mut out = vec![self.canvas.name.as_str()];
        for child in self
            .group
            .iter()
            .chain(&self.split)
            .chain(&self.content)
            .chain(self.pages.iter().flat_map(|p| &p.canvases))
            .chain(&self.popups)
        {
            out.extend(child.names());
        }
        out
    }
}

/// Arena of all canvases of one form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasArena {
    nodes: Vec<Option<CanvasProperties>>,
    /// Top-level canvases in document order.
    roots: Vec<CanvasId>,
    /// Popup canvases, wherever they were declared.
    popups: Vec<CanvasId>,
    index: HashMap<String, CanvasId>,
}

impl CanvasArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CanvasId) -> Option<&CanvasProperties> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: CanvasId) -> Option<&mut CanvasProperties> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn id_of(&self, name: &str) -> Option<CanvasId> {
        self.index.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&CanvasProperties> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn roots(&self) -> impl Iterator<Item = &CanvasProperties> {
        self.roots.iter().filter_map(|id| self.get(*id))
    }

    pub fn popups(&self) -> impl Iterator<Item = &CanvasProperties> {
        self.popups.iter().filter_map(|id| self.get(*id))
    }

    pub fn root_ids(&self) -> &[CanvasId] {
        &self.roots
    }

    pub fn popup_ids(&self) -> &[CanvasId] {
        &self.popups
    }

    /// Number of live canvases.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every live canvas, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (CanvasId, &CanvasProperties)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|c| (CanvasId(i as u32), c)))
    }

    pub fn children(&self, id: CanvasId) -> Vec<&CanvasProperties> {
        self.get(id)
            .map(|c| c.child_ids().filter_map(|cid| self.get(cid)).collect())
            .unwrap_or_default()
    }

    /// Inserts a finished top-level tree (or a popup) declared by the form.
    pub fn insert_root(&mut self, tree: CanvasTree, form_name: &str) -> FormResult<CanvasId> {
        self.check_names(&tree, form_name)?;
        let is_popup = tree.canvas.canvas_type == CanvasType::Popup;
        let id = self.insert_tree(tree, None);
        if is_popup {
            self.popups.push(id);
        } else {
            self.roots.push(id);
        }
        Ok(id)
    }

    fn check_names(&self, tree: &CanvasTree, form_name: &str) -> FormResult<()> {
        let mut seen = std::collections::HashSet::new();
        for name in tree.names() {
            if self.index.contains_key(name) || !seen.insert(name) {
                return Err(FormError::duplicate("canvas", name, form_name));
            }
        }
        Ok(())
    }

    fn alloc(&mut self, canvas: CanvasProperties) -> CanvasId {
        let id = CanvasId(self.nodes.len() as u32);
        self.index.insert(canvas.name.clone(), id);
        self.nodes.push(Some(canvas));
        id
    }

    /// Flattens `tree` below `parent`; names must already be checked.
    fn insert_tree(&mut self, tree: CanvasTree, parent: Option<CanvasId>) -> CanvasId {
        let CanvasTree { mut canvas, group, split, content, pages, popups } = tree;
        canvas.clear_links();
        canvas.parent = parent;
        canvas.pages = pages.iter().map(|p| p.page.clone()).collect();
        let id = self.alloc(canvas);
        self.insert_children(id, group, split, content, pages, popups);
        id
    }

    fn insert_children(
        &mut self,
        id: CanvasId,
        group: Vec<CanvasTree>,
        split: Vec<CanvasTree>,
        content: Vec<CanvasTree>,
        pages: Vec<PageTree>,
        popups: Vec<CanvasTree>,
    ) {
        let group_ids: Vec<_> = group.into_iter().map(|t| self.insert_tree(t, Some(id))).collect();
        let split_ids: Vec<_> = split.into_iter().map(|t| self.insert_tree(t, Some(id))).collect();
        let content_ids: Vec<_> = content.into_iter().map(|t| self.insert_tree(t, Some(id))).collect();
        let page_ids: Vec<Vec<CanvasId>> = pages
            .into_iter()
            .map(|p| p.canvases.into_iter().map(|t| self.insert_tree(t, Some(id))).collect())
            .collect();
        for popup in popups {
            let popup_id = self.insert_tree(popup, None);
            self.popups.push(popup_id);
        }

        if let Some(node) = self.get_mut(id) {
            node.group_canvases = group_ids;
            node.split_canvases = split_ids;
            node.content_canvases = content_ids;
            for (page, ids) in node.pages.iter_mut().zip(page_ids) {
                page.canvases = ids;
            }
        }
    }

    /// Rebuilds the owned tree of `id` (used when merging into another form).
    pub fn subtree(&self, id: CanvasId) -> Option<CanvasTree> {
        let node = self.get(id)?;
        let build = |ids: &[CanvasId]| -> Vec<CanvasTree> { ids.iter().filter_map(|c| self.subtree(*c)).collect() };
        let mut canvas = node.clone();
        let pages = node
            .pages
            .iter()
            .map(|p| PageTree {
                page: p.clone(),
                canvases: build(&p.canvases),
            })
            .collect();
        let tree = CanvasTree {
            group: build(&node.group_canvases),
            split: build(&node.split_canvases),
            content: build(&node.content_canvases),
            pages,
            popups: Vec::new(),
            canvas: {
                canvas.clear_links();
                canvas
            },
        };
        Some(tree)
    }

    /// Frees `id`'s descendants (not `id` itself) and drops their names.
    fn free_descendants(&mut self, id: CanvasId) {
        let children: Vec<CanvasId> = match self.get(id) {
            Some(node) => node.child_ids().collect(),
            None => return,
        };
        for child in children {
            self.free_descendants(child);
            if let Some(node) = self.nodes.get_mut(child.0 as usize).and_then(Option::take) {
                self.index.remove(&node.name);
            }
        }
    }

    /// Replaces the canvas called `tree.name()` in place. Content comes from
    /// `tree`; geometry, parent and placement stay with the existing canvas.
    pub fn replace_keeping_geometry(&mut self, tree: CanvasTree, form_name: &str) -> FormResult<CanvasId> {
        let id = self
            .id_of(tree.name())
            .ok_or_else(|| FormError::canvas_not_found(tree.name(), form_name))?;

        // имена потомков нового дерева не должны пересекаться с оставшимися
        let replaced = self.descendant_names(id);
        let mut seen = std::collections::HashSet::new();
        for name in tree.names().into_iter().skip(1) {
            let taken = self.index.contains_key(name) && !replaced.contains(name);
            if taken || !seen.insert(name) {
                return Err(FormError::duplicate("canvas", name, form_name));
            }
        }
        self.free_descendants(id);

        let CanvasTree { mut canvas, group, split, content, pages, popups } = tree;
        let existing = self
            .get(id)
            .cloned()
            .ok_or_else(|| FormError::canvas_not_found(&canvas.name, form_name))?;
        canvas.clear_links();
        canvas.geometry = existing.geometry;
        canvas.parent = existing.parent;
        canvas.content_canvas_name = existing.content_canvas_name;
        canvas.content_canvas_page_name = existing.content_canvas_page_name;
        canvas.pages = pages.iter().map(|p| p.page.clone()).collect();
        if let Some(slot) = self.nodes.get_mut(id.0 as usize) {
            *slot = Some(canvas);
        }
        self.insert_children(id, group, split, content, pages, popups);
        Ok(id)
    }

    /// Names of every canvas below `id`.
    fn descendant_names(&self, id: CanvasId) -> std::collections::HashSet<String> {
        let mut names = std::collections::HashSet::new();
        let mut pending: Vec<CanvasId> = self.get(id).map(|c| c.child_ids().collect()).unwrap_or_default();
        while let Some(child) = pending.pop() {
            if let Some(node) = self.get(child) {
                names.insert(node.name.clone());
                pending.extend(node.child_ids());
            }
        }
        names
    }

    /// A form canvas declared after an object group already supplied the
    /// same name. The group's canvas and content stay; a non-popup takes the
    /// geometry of `host`. The host's own descendants are dropped, as when
    /// the group is merged over an existing canvas.
    pub fn adopt_host_canvas(&mut self, host: CanvasTree, form_name: &str) -> FormResult<CanvasId> {
        let id = self
            .id_of(host.name())
            .ok_or_else(|| FormError::canvas_not_found(host.name(), form_name))?;
        let host_is_popup = host.canvas.canvas_type == CanvasType::Popup;
        if host_is_popup != self.popups.contains(&id) {
            return Err(FormError::new(
                MessageKey::InvalidCanvasPlacement,
                ["POPUP canvas", "non-popup", host.name()],
            ));
        }
        if !host_is_popup {
            if let Some(node) = self.get_mut(id) {
                node.geometry = host.canvas.geometry;
            }
        }
        Ok(id)
    }

    /// Replaces a popup wholesale, or adds it when new.
    pub fn replace_popup(&mut self, tree: CanvasTree, form_name: &str) -> FormResult<CanvasId> {
        if let Some(id) = self.id_of(tree.name()) {
            let is_popup = self.popups.contains(&id);
            if !is_popup {
                return Err(FormError::new(
                    MessageKey::InvalidCanvasPlacement,
                    ["POPUP canvas", "non-popup", tree.name()],
                ));
            }
            self.free_descendants(id);
            if let Some(node) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) {
                self.index.remove(&node.name);
            }
            self.popups.retain(|p| *p != id);
        }
        self.insert_root(tree, form_name)
    }
}
