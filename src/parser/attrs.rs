//! Attribute and text-value helpers shared by every reader.

use quick_xml::events::BytesStart;

use crate::core::{FormError, FormResult, MessageKey};

/// Attributes of one element start, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn from_start(element: &BytesStart<'_>) -> FormResult<Self> {
        let mut entries = Vec::new();
        for attr in element.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            entries.push((key, value));
        }
        Ok(Self { entries })
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.trim().to_string())
    }

    pub fn required(&self, tag: &str, name: &str) -> FormResult<String> {
        self.string(name)
            .ok_or_else(|| FormError::missing_attribute(tag, name))
    }

    pub fn flag(&self, name: &str, default: bool) -> FormResult<bool> {
        match self.get(name) {
            Some(v) => parse_bool(v, name),
            None => Ok(default),
        }
    }
}

pub fn parse_bool(value: &str, what: &str) -> FormResult<bool> {
    match value.trim() {
        "true" | "TRUE" | "True" => Ok(true),
        "false" | "FALSE" | "False" => Ok(false),
        other => Err(FormError::invalid_value(other, what, "true or false")),
    }
}

pub fn parse_u32(value: &str, what: &str) -> FormResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| FormError::invalid_value(value.trim(), what, "a non-negative integer"))
}

/// Element text as an optional value; empty text means "not set".
pub fn text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn unexpected(tag: &str, owner: &str) -> FormError {
    FormError::new(MessageKey::UnexpectedElement, [tag, owner])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_attribute_counts_as_missing() {
        let attrs = Attributes::from_pairs(&[("name", "  "), ("referenced", "true")]);
        assert!(attrs.get("name").is_none());
        assert_eq!(
            attrs.required("block", "name").unwrap_err().to_string(),
            "element <block> requires the attribute name"
        );
        assert!(attrs.flag("referenced", false).unwrap());
        assert!(!attrs.flag("controlBlock", false).unwrap());
    }

    #[test]
    fn test_value_parsing() {
        assert_eq!(parse_u32(" 42 ", "width").unwrap(), 42);
        assert_eq!(parse_u32("-1", "width").unwrap_err().key(), MessageKey::InvalidValue);
        assert!(parse_bool("yes", "visible").is_err());
        assert_eq!(text("  "), None);
    }
}
