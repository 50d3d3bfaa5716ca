/*!
# Error System for the Definition Loader

One application error for every failure the loader can report: structural
parse failures, unresolved references, missing imported definitions and
downstream lookups on a finished property graph.

An error is a message-template key from a closed catalog plus positional
substitution strings. Templates use `$1`, `$2`, ... placeholders.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::position::Position;

pub type FormResult<T> = Result<T, FormError>;

/// Closed catalog of message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    MalformedSource,
    UnexpectedRootElement,
    UnexpectedElement,
    MissingAttribute,
    MissingProperty,
    InvalidValue,
    DuplicateName,
    NoItemOnBlock,
    BlockNotFound,
    CanvasNotFound,
    InvalidCanvasPlacement,
    StackedPageNotFound,
    LovDefinitionNotFound,
    LovMappingNotFound,
    DefinitionNotFound,
    CyclicReference,
    RendererNotDefined,
    ComponentNotRegistered,
    VisualAttributeNotFound,
    FormNameMismatch,
    UnboundField,
    Io,
}

impl MessageKey {
    /// Message template with `$n` placeholders.
    pub fn template(self) -> &'static str {
        match self {
            MessageKey::MalformedSource => "malformed definition source: $1",
            MessageKey::UnexpectedRootElement => "expected root element <$1> but found <$2>",
            MessageKey::UnexpectedElement => "element <$1> is not allowed inside <$2>",
            MessageKey::MissingAttribute => "element <$1> requires the attribute $2",
            MessageKey::MissingProperty => "$1 $2 requires the property $3",
            MessageKey::InvalidValue => "invalid value '$1' for $2 (expected $3)",
            MessageKey::DuplicateName => "a $1 called $2 already exists in $3",
            MessageKey::NoItemOnBlock => "no item called $1 on block $2",
            MessageKey::BlockNotFound => "no block called $1 on form $2",
            MessageKey::CanvasNotFound => "no canvas called $1 on form $2",
            MessageKey::InvalidCanvasPlacement => "a $1 cannot be placed inside the $2 canvas $3",
            MessageKey::StackedPageNotFound => "no stacked page called $1 on canvas $2",
            MessageKey::LovDefinitionNotFound => "no lov definition called $1 on form $2",
            MessageKey::LovMappingNotFound => "no lov mapping called $1 on block $2",
            MessageKey::DefinitionNotFound => "no $1 definition called $2",
            MessageKey::CyclicReference => "cyclic reference while loading $1: $2",
            MessageKey::RendererNotDefined => "no $1 renderer called $2 has been defined",
            MessageKey::ComponentNotRegistered => "no $1 called $2 has been registered",
            MessageKey::VisualAttributeNotFound => "no visual attribute called $1",
            MessageKey::FormNameMismatch => "definition $1 declares the name $2",
            MessageKey::UnboundField => "data object field $1 is not bound for block $2",
            MessageKey::Io => "unable to read $1: $2",
        }
    }

    /// Substitutes positional arguments into the template.
    pub fn render(self, args: &[String]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len() + 16);
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                digits.push(*d);
                chars.next();
            }
            match digits.parse::<usize>() {
                Ok(n) if n > 0 => {
                    if let Some(arg) = args.get(n - 1) {
                        out.push_str(arg);
                    }
                }
                _ => {
                    out.push('$');
                    out.push_str(&digits);
                }
            }
        }
        out
    }
}

/// Where in which definition an error was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub definition: String,
    pub position: Option<Position>,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            // строки и колонки в сообщениях считаем с единицы
            Some(p) => write!(f, "{}:{}:{}", self.definition, p.line + 1, p.column + 1),
            None => write!(f, "{}", self.definition),
        }
    }
}

/// The application error.
#[derive(Debug, Clone, Error)]
#[error("{}", describe(.key, .args, .location))]
pub struct FormError {
    key: MessageKey,
    args: Vec<String>,
    location: Option<SourceLocation>,
}

fn describe(key: &MessageKey, args: &[String], location: &Option<SourceLocation>) -> String {
    let message = key.render(args);
    match location {
        Some(loc) => format!("{} ({})", message, loc),
        None => message,
    }
}

impl FormError {
    pub fn new<I, S>(key: MessageKey, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key,
            args: args.into_iter().map(Into::into).collect(),
            location: None,
        }
    }

    pub fn key(&self) -> MessageKey {
        self.key
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Message without location suffix.
    pub fn message(&self) -> String {
        self.key.render(&self.args)
    }

    /// Attaches a location unless a deeper one is already recorded.
    ///
    /// Errors raised inside an imported definition keep the location in the
    /// imported file; the host only fills in locations that are missing.
    pub fn at(mut self, definition: &str, position: Option<Position>) -> Self {
        if self.location.is_none() {
            self.location = Some(SourceLocation {
                definition: definition.to_string(),
                position,
            });
        }
        self
    }

    pub fn malformed(detail: impl fmt::Display) -> Self {
        Self::new(MessageKey::MalformedSource, [detail.to_string()])
    }

    pub fn duplicate(what: &str, name: &str, container: &str) -> Self {
        Self::new(MessageKey::DuplicateName, [what, name, container])
    }

    pub fn no_item_on_block(item: &str, block: &str) -> Self {
        Self::new(MessageKey::NoItemOnBlock, [item, block])
    }

    pub fn block_not_found(block: &str, form: &str) -> Self {
        Self::new(MessageKey::BlockNotFound, [block, form])
    }

    pub fn canvas_not_found(canvas: &str, form: &str) -> Self {
        Self::new(MessageKey::CanvasNotFound, [canvas, form])
    }

    pub fn invalid_value(value: &str, what: &str, expected: &str) -> Self {
        Self::new(MessageKey::InvalidValue, [value, what, expected])
    }

    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::new(MessageKey::MissingAttribute, [element, attribute])
    }

    pub fn io(what: &str, err: &std::io::Error) -> Self {
        Self::new(MessageKey::Io, [what.to_string(), err.to_string()])
    }
}

impl From<quick_xml::Error> for FormError {
    fn from(err: quick_xml::Error) -> Self {
        FormError::malformed(err)
    }
}

impl From<quick_xml::events::attributes::AttrError> for FormError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        FormError::malformed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_positional_arguments() {
        let err = FormError::no_item_on_block("CUSTOMER_ID", "ORDERS");
        assert_eq!(err.to_string(), "no item called CUSTOMER_ID on block ORDERS");
        assert_eq!(err.key(), MessageKey::NoItemOnBlock);
    }

    #[test]
    fn test_missing_arguments_render_empty() {
        let msg = MessageKey::BlockNotFound.render(&["ORDERS".to_string()]);
        assert_eq!(msg, "no block called ORDERS on form ");
    }

    #[test]
    fn test_location_is_kept_from_innermost() {
        let err = FormError::malformed("bad")
            .at("ORDERS.block", Some(Position::new(2, 4, 30)))
            .at("MAIN.form", None);
        let loc = err.location().unwrap();
        assert_eq!(loc.definition, "ORDERS.block");
        assert!(err.to_string().ends_with("(ORDERS.block:3:5)"));
    }
}
