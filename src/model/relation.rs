//! Master/detail relations between blocks of one form.

use serde::{Deserialize, Serialize};

use super::container::Named;

/// Position of a block in its form's block container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationJoin {
    pub master_item: String,
    pub detail_item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationProperties {
    pub name: String,
    pub master_block_name: String,
    pub detail_block_name: String,
    /// Resolved when the relation is attached to its form.
    pub master_block: Option<BlockId>,
    pub detail_block: Option<BlockId>,
    pub prevent_masterless_operations: bool,
    pub deferred_query: bool,
    pub auto_query: bool,
    pub joins: Vec<RelationJoin>,
}

impl RelationProperties {
    pub fn new(name: impl Into<String>, master: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            master_block_name: master.into(),
            detail_block_name: detail.into(),
            master_block: None,
            detail_block: None,
            prevent_masterless_operations: true,
            deferred_query: false,
            auto_query: true,
            joins: Vec::new(),
        }
    }
}

impl Named for RelationProperties {
    const KIND: &'static str = "relation";
    fn name(&self) -> &str {
        &self.name
    }
}
