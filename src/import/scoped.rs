//! Scoped names for imported reusable definitions and the textual rewrites
//! applied while merging them.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// `[NAME]`, or `ALIAS.[NAME]` when imported inside a referenced block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedName {
    pub scope: Option<String>,
    pub name: String,
}

impl ScopedName {
    pub fn new(scope: Option<&str>, name: &str) -> Self {
        Self {
            scope: scope.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Whether `value` already is a scoped name.
    pub fn is_scoped(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    pub fn parse(value: &str) -> Option<Self> {
        let caps = SCOPED_NAME.captures(value)?;
        Some(Self {
            scope: caps.get(1).map(|m| m.as_str().to_string()),
            name: caps.get(2)?.as_str().to_string(),
        })
    }

    /// The same definition seen from inside the referenced block `alias`.
    pub fn within(&self, alias: &str) -> Self {
        Self {
            scope: Some(alias.to_string()),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for ScopedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}.[{}]", scope, self.name),
            None => write!(f, "[{}]", self.name),
        }
    }
}

static SCOPED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^\[\]]+)\.)?\[([^\[\]]+)\]$").expect("scoped name pattern")
});

static BLOCK_ITEM_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"BLOCK_ITEM:([A-Za-z_][A-Za-z0-9_$#]*)\.([A-Za-z_][A-Za-z0-9_$#]*)").expect("block item pattern")
});

/// Rewrites `BLOCK_ITEM:<from>.<item>` references to `BLOCK_ITEM:<to>.<item>`.
/// References to other blocks are left alone. Returns `None` when nothing
/// changed.
pub fn rewrite_block_item_refs(value: &str, from: &str, to: &str) -> Option<String> {
    let mut changed = false;
    let rewritten = BLOCK_ITEM_REF.replace_all(value, |caps: &regex::Captures<'_>| {
        if &caps[1] == from {
            changed = true;
            format!("BLOCK_ITEM:{}.{}", to, &caps[2])
        } else {
            caps[0].to_string()
        }
    });
    if changed {
        Some(rewritten.into_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_name_format() {
        assert_eq!(ScopedName::new(None, "CUSTOMERS").to_string(), "[CUSTOMERS]");
        assert_eq!(ScopedName::new(Some("ORD"), "CUSTOMERS").to_string(), "ORD.[CUSTOMERS]");
        assert_eq!(
            ScopedName::parse("ORD.[CUSTOMERS]"),
            Some(ScopedName::new(Some("ORD"), "CUSTOMERS"))
        );
        assert!(ScopedName::is_scoped("[X]"));
        assert!(!ScopedName::is_scoped("X"));
        assert!(!ScopedName::is_scoped("A.[X]]"));
    }

    #[test]
    fn test_block_item_rewrite_targets_original_block_only() {
        let value = "BLOCK_ITEM:ORDERS.CUSTOMER_ID and BLOCK_ITEM:OTHER.ID";
        assert_eq!(
            rewrite_block_item_refs(value, "ORDERS", "ORD2").as_deref(),
            Some("BLOCK_ITEM:ORD2.CUSTOMER_ID and BLOCK_ITEM:OTHER.ID")
        );
        assert_eq!(rewrite_block_item_refs("BLOCK_ITEM:ORDERSX.ID", "ORDERS", "A"), None);
        assert_eq!(rewrite_block_item_refs("plain", "ORDERS", "A"), None);
    }
}
