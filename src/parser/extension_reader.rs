//! Reader for schema-less extension properties: any `*Properties` element,
//! nested `propertyGroup`s and `propertyList`s of `listEntry` rows.

use super::attrs::{parse_bool, text, unexpected, Attributes};
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::FormResult;
use crate::import::import_property_lov;
use crate::model::{
    ExtensionProperty, ExtensionPropertyGroup, ExtensionPropertyList, ExtensionPropertyListEntry, PropertyKind,
};

/// A `<property>` whose start has been seen and whose text is pending.
#[derive(Debug)]
struct PendingProperty {
    name: String,
    kind: PropertyKind,
    multilingual: bool,
}

impl PendingProperty {
    fn open(attrs: &Attributes) -> FormResult<Self> {
        Ok(Self {
            name: attrs.required("property", "name")?,
            kind: PropertyKind::parse(attrs.get("type").unwrap_or_default())?,
            multilingual: attrs
                .get("multilingual")
                .map(|v| parse_bool(v, "multilingual"))
                .transpose()?
                .unwrap_or(false),
        })
    }

    fn complete(self, session: &mut ParseSession<'_>, value: &str) -> FormResult<ExtensionProperty> {
        let mut property = ExtensionProperty {
            value: text(value),
            multilingual: self.multilingual,
            ..ExtensionProperty::new(self.name, self.kind)
        };
        property.validate()?;
        import_property_lov(session, &mut property)?;
        Ok(property)
    }
}

pub struct ExtensionGroupFrame {
    group: ExtensionPropertyGroup,
    tag: String,
    pending: Option<PendingProperty>,
}

impl ExtensionGroupFrame {
    /// `<propertyGroup name="...">` is named by its attribute; any other
    /// properties element by its tag.
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        let name = if start.tag == "propertyGroup" {
            start.attrs.required("propertyGroup", "name")?
        } else {
            start.tag.clone()
        };
        Ok(Self {
            group: ExtensionPropertyGroup::new(name),
            tag: start.tag.clone(),
            pending: None,
        })
    }
}

impl ElementHandler for ExtensionGroupFrame {
    fn owner(&self) -> &str {
        &self.tag
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "property" => {
                self.pending = Some(PendingProperty::open(&start.attrs)?);
                Ok(Step::Continue)
            }
            "propertyGroup" => Step::delegate(ExtensionGroupFrame::open(start)?),
            "propertyList" => Step::delegate(ExtensionListFrame::open(start)?),
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        match (end.tag.as_str(), self.pending.take()) {
            ("property", Some(pending)) => {
                let property = pending.complete(session, &end.text)?;
                self.group.properties.insert(property, &self.group.name)?;
                Ok(())
            }
            (tag, _) => Err(unexpected(tag, &self.tag)),
        }
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::ExtensionGroup(group) => {
                self.group.groups.insert(group, &self.group.name)?;
            }
            Parsed::ExtensionList(list) => {
                self.group.lists.insert(list, &self.group.name)?;
            }
            other => return Err(unexpected(other.describe(), &self.tag)),
        }
        Ok(())
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::ExtensionGroup(self.group))
    }
}

pub struct ExtensionListFrame {
    list: ExtensionPropertyList,
    pending: Option<PendingProperty>,
}

impl ExtensionListFrame {
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        Ok(Self {
            list: ExtensionPropertyList {
                name: start.attrs.required("propertyList", "name")?,
                entries: Vec::new(),
            },
            pending: None,
        })
    }
}

impl ElementHandler for ExtensionListFrame {
    fn owner(&self) -> &str {
        "propertyList"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        match start.tag.as_str() {
            "listEntry" => self.list.entries.push(ExtensionPropertyListEntry::default()),
            "property" => self.pending = Some(PendingProperty::open(&start.attrs)?),
            _ => {}
        }
        Ok(Step::Continue)
    }

    fn on_end(&mut self, session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        match end.tag.as_str() {
            "listEntry" => Ok(()),
            "property" => {
                let pending = self.pending.take();
                let (Some(pending), Some(_)) = (pending, self.list.entries.last()) else {
                    return Err(unexpected("property", "propertyList"));
                };
                let property = pending.complete(session, &end.text)?;
                if let Some(entry) = self.list.entries.last_mut() {
                    if entry.properties.contains_key(&property.name) {
                        return Err(crate::core::FormError::duplicate("property", &property.name, &self.list.name));
                    }
                    entry.properties.insert(property.name.clone(), property);
                }
                Ok(())
            }
            tag => Err(unexpected(tag, "propertyList")),
        }
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::ExtensionList(self.list))
    }
}
