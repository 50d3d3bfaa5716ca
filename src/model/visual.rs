//! Visual attributes: named font/color bundles declared in the application
//! properties and referenced by items and screen items.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::container::Named;
use crate::core::{FormError, FormResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Accepts `#RRGGBB` or `r,g,b`.
    pub fn parse(value: &str) -> FormResult<Self> {
        let value = value.trim();
        let invalid = || FormError::invalid_value(value, "color", "#RRGGBB or r,g,b");

        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
            };
            return Ok(Color {
                red: channel(0..2)?,
                green: channel(2..4)?,
                blue: channel(4..6)?,
            });
        }

        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
        Ok(Color {
            red: channel(parts[0])?,
            green: channel(parts[1])?,
            blue: channel(parts[2])?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualAttributeProperties {
    pub name: String,
    pub font_name: Option<String>,
    pub font_size: Option<u32>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
    pub markup_type: Option<String>,
}

impl VisualAttributeProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Named for VisualAttributeProperties {
    const KIND: &'static str = "visual attribute";
    fn name(&self) -> &str {
        &self.name
    }
}
