//! Application menus: a tree of branches whose leaves open forms, fire
//! action commands or separate entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::container::{Named, NamedContainer};
use crate::core::{FormError, FormResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuLeafType {
    Branch,
    Form,
    Action,
    Spacer,
}

impl MenuLeafType {
    pub fn parse(value: &str) -> FormResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BRANCH" => Ok(MenuLeafType::Branch),
            "FORM" => Ok(MenuLeafType::Form),
            "ACTION" => Ok(MenuLeafType::Action),
            "SPACER" => Ok(MenuLeafType::Spacer),
            _ => Err(FormError::invalid_value(value, "menu leaf type", "BRANCH, FORM, ACTION or SPACER")),
        }
    }
}

impl fmt::Display for MenuLeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MenuLeafType::Branch => "BRANCH",
            MenuLeafType::Form => "FORM",
            MenuLeafType::Action => "ACTION",
            MenuLeafType::Spacer => "SPACER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuLeafProperties {
    pub name: String,
    pub leaf_type: MenuLeafType,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    /// FORM leaves.
    pub form_name: Option<String>,
    /// ACTION leaves.
    pub action_command: Option<String>,
    /// BRANCH leaves.
    pub leaves: NamedContainer<MenuLeafProperties>,
}

impl MenuLeafProperties {
    pub fn new(name: impl Into<String>, leaf_type: MenuLeafType) -> Self {
        Self {
            name: name.into(),
            leaf_type,
            display_name: None,
            description: None,
            icon_name: None,
            form_name: None,
            action_command: None,
            leaves: NamedContainer::new(),
        }
    }

    /// Form names opened from this leaf and everything below it.
    pub fn form_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.form_name.as_deref().into_iter().collect();
        for leaf in self.leaves.iter() {
            out.extend(leaf.form_names());
        }
        out
    }
}

impl Named for MenuLeafProperties {
    const KIND: &'static str = "menu leaf";
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuProperties {
    pub name: String,
    pub is_default: bool,
    pub leaves: NamedContainer<MenuLeafProperties>,
}

impl MenuProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_default: false,
            leaves: NamedContainer::new(),
        }
    }

    pub fn form_names(&self) -> Vec<&str> {
        self.leaves.iter().flat_map(|l| l.form_names()).collect()
    }
}

impl Named for MenuProperties {
    const KIND: &'static str = "menu";
    fn name(&self) -> &str {
        &self.name
    }
}
