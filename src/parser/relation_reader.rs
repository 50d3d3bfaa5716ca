//! Reader for master/detail `<relation>` elements. Block resolution happens
//! when the form integrates the finished relation.

use super::attrs::unexpected;
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::session::ParseSession;
use crate::core::FormResult;
use crate::model::{RelationJoin, RelationProperties};

pub struct RelationFrame {
    relation: RelationProperties,
}

impl RelationFrame {
    pub fn open(start: &ElementStart) -> FormResult<Self> {
        let attrs = &start.attrs;
        let mut relation = RelationProperties::new(
            attrs.required("relation", "name")?,
            attrs.required("relation", "masterBlockName")?,
            attrs.required("relation", "detailBlockName")?,
        );
        relation.prevent_masterless_operations = attrs.flag("preventMasterlessOperations", true)?;
        relation.deferred_query = attrs.flag("deferredQuery", false)?;
        relation.auto_query = attrs.flag("autoQuery", true)?;
        Ok(Self { relation })
    }
}

impl ElementHandler for RelationFrame {
    fn owner(&self) -> &str {
        "relation"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        if start.tag == "join" {
            self.relation.joins.push(RelationJoin {
                master_item: start.attrs.required("join", "masterItem")?,
                detail_item: start.attrs.required("join", "detailItem")?,
            });
        }
        Ok(Step::Continue)
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        match end.tag.as_str() {
            "joinList" | "join" => Ok(()),
            tag => Err(unexpected(tag, "relation")),
        }
    }

    fn finish(self, _session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        Ok(Parsed::Relation(self.relation))
    }
}
