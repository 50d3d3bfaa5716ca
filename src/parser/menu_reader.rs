//! Readers for `<applicationMenu>` trees. Only BRANCH leaves hold nested
//! leaves; FORM and ACTION leaves must say what they open.

use super::attrs::{text, unexpected};
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::{FormError, FormResult, MessageKey};
use crate::model::{MenuLeafProperties, MenuLeafType, MenuProperties};

pub struct MenuFrame {
    menu: MenuProperties,
}

impl MenuFrame {
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        let mut menu = MenuProperties::new(start.attrs.required("applicationMenu", "name")?);
        menu.is_default = start.attrs.flag("default", false)?;
        Ok(Self { menu })
    }
}

impl ElementHandler for MenuFrame {
    fn owner(&self) -> &str {
        "applicationMenu"
    }

    fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "leaf" => Step::delegate(MenuLeafFrame::open(session, start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        match end.tag.as_str() {
            "leafList" => Ok(()),
            tag => Err(unexpected(tag, "applicationMenu")),
        }
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::MenuLeaf(leaf) => {
                let owner = self.menu.name.clone();
                self.menu.leaves.insert(leaf, &owner)?;
                Ok(())
            }
            other => Err(unexpected(other.describe(), "applicationMenu")),
        }
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::Menu(self.menu))
    }
}

pub struct MenuLeafFrame {
    leaf: MenuLeafProperties,
}

impl MenuLeafFrame {
    pub fn open(session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Self> {
        let leaf_type = MenuLeafType::parse(&start.attrs.required("leaf", "type")?)?;
        // разделители обычно безымянны
        let name = match start.attrs.string("name") {
            Some(name) => name,
            None => session.generate_name("leaf"),
        };
        Ok(Self {
            leaf: MenuLeafProperties::new(name, leaf_type),
        })
    }
}

impl ElementHandler for MenuLeafFrame {
    fn owner(&self) -> &str {
        "leaf"
    }

    fn on_start(&mut self, session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "leaf" if self.leaf.leaf_type == MenuLeafType::Branch => {
                Step::delegate(MenuLeafFrame::open(session, start)?)
            }
            "leaf" => Err(unexpected("leaf", &format!("leaf type=\"{}\"", self.leaf.leaf_type))),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        let leaf = &mut self.leaf;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "displayName" => leaf.display_name = text(value),
            "description" => leaf.description = text(value),
            "iconName" => leaf.icon_name = text(value),
            "formName" => leaf.form_name = text(value),
            "actionCommand" => leaf.action_command = text(value),
            "leafList" => {}
            tag => return Err(unexpected(tag, "leaf")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::MenuLeaf(leaf) => {
                let owner = self.leaf.name.clone();
                self.leaf.leaves.insert(leaf, &owner)?;
                Ok(())
            }
            other => Err(unexpected(other.describe(), "leaf")),
        }
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        let leaf = &self.leaf;
        let missing = match leaf.leaf_type {
            MenuLeafType::Form if leaf.form_name.is_none() => Some("formName"),
            MenuLeafType::Action if leaf.action_command.is_none() => Some("actionCommand"),
            _ => None,
        };
        if let Some(property) = missing {
            return Err(FormError::new(MessageKey::MissingProperty, ["menu leaf", leaf.name.as_str(), property]));
        }
        Ok(Parsed::MenuLeaf(self.leaf))
    }
}
