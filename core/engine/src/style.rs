//! FILENAME: core/engine/src/style.rs
//! PURPOSE: Style configuration shared by every renderer.
//! CONTEXT: The `styles` block of a report configuration is deserialized into
//! `StyleConfig`. Renderers never read raw JSON; they ask the config for a
//! resolved `CellStyle` per style bucket and a `TextAlign` per cell kind.
//! Each invocation builds its own `StyleConfig`; nothing here is global.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Style bucket names recognized in `colors`.
pub const HEADER_BUCKET: &str = "header";
pub const DEFAULT_BUCKET: &str = "default";
pub const SUBTOTAL_BUCKET: &str = "subtotal";
pub const GRAND_TOTAL_BUCKET: &str = "grand_total";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("invalid color '{value}' for style '{bucket}'")]
    InvalidColor { bucket: String, value: String },

    #[error("invalid alignment '{0}'")]
    InvalidAlignment(String),
}

/// Horizontal alignment options for cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum TextAlign {
    #[default]
    General, // Auto: numbers right, text left
    Left,
    Center,
    Right,
}

impl FromStr for TextAlign {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" | "" => Ok(TextAlign::General),
            "left" => Ok(TextAlign::Left),
            "center" | "centre" => Ok(TextAlign::Center),
            "right" | "decimal" => Ok(TextAlign::Right),
            _ => Err(StyleError::InvalidAlignment(s.to_string())),
        }
    }
}

impl TryFrom<String> for TextAlign {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextAlign> for String {
    fn from(value: TextAlign) -> Self {
        match value {
            TextAlign::General => "general",
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
        .to_string()
    }
}

/// RGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const fn black() -> Self {
        Color::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Color::new(255, 255, 255)
    }

    /// Parse from hex string: "#RRGGBB", "RRGGBB", or spreadsheet-style
    /// "AARRGGBB" (alpha is dropped).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let rgb = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return None,
        };
        let r = u8::from_str_radix(&rgb[0..2], 16).ok()?;
        let g = u8::from_str_radix(&rgb[2..4], 16).ok()?;
        let b = u8::from_str_radix(&rgb[4..6], 16).ok()?;
        Some(Color::new(r, g, b))
    }

    /// Packed 0xRRGGBB.
    pub fn to_rgb_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Components scaled to 0.0..=1.0, as PDF color operators expect.
    pub fn to_unit_rgb(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}

/// Fill and text color of one style bucket as written in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub text: String,
}

impl ColorPair {
    pub fn new(background: &str, text: &str) -> Self {
        ColorPair {
            background: background.to_string(),
            text: text.to_string(),
        }
    }
}

/// A fully resolved style for the cells of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub background: Color,
    pub text_color: Color,
    pub bold: bool,
}

/// Per-content alignment overrides for data cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAlignment {
    #[serde(default)]
    pub numbers: Option<TextAlign>,
    #[serde(default)]
    pub text: Option<TextAlign>,
    #[serde(default)]
    pub subtotal: Option<TextAlign>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    #[serde(default)]
    pub global: Option<TextAlign>,
    #[serde(default)]
    pub header: Option<TextAlign>,
    #[serde(default)]
    pub content: ContentAlignment,
}

/// What a cell holds, as far as alignment is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Number,
    /// Text in a subtotal or grand-total row.
    TotalText,
    Text,
}

impl AlignmentConfig {
    /// Header cells use `header`; data cells use the matching `content`
    /// entry; anything unset falls back to `global`, then left.
    pub fn resolve(&self, kind: CellKind) -> TextAlign {
        let specific = match kind {
            CellKind::Header => self.header,
            CellKind::Number => self.content.numbers,
            CellKind::TotalText => self.content.subtotal,
            CellKind::Text => self.content.text,
        };
        specific.or(self.global).unwrap_or(TextAlign::Left)
    }
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default = "one_inch")]
    pub top: f32,
    #[serde(default = "one_inch")]
    pub bottom: f32,
    #[serde(default = "one_inch")]
    pub left: f32,
    #[serde(default = "one_inch")]
    pub right: f32,
}

fn one_inch() -> f32 {
    1.0
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 1.0,
            bottom: 1.0,
            left: 1.0,
            right: 1.0,
        }
    }
}

fn default_paginate() -> bool {
    true
}

/// The `styles` block of a report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Bucket name -> colors. Recognized buckets: header, default, subtotal,
    /// subtotal_<n>, grand_total.
    #[serde(default)]
    pub colors: BTreeMap<String, ColorPair>,

    #[serde(default)]
    pub alignment: AlignmentConfig,

    #[serde(default)]
    pub margins: Margins,

    /// Flow rows over several pages (document output only).
    #[serde(default = "default_paginate")]
    pub paginate: bool,

    /// Smallest page, [width, height] in points.
    #[serde(default)]
    pub min_page_size: Option<[f32; 2]>,

    /// Largest page, [width, height] in points.
    #[serde(default)]
    pub max_page_size: Option<[f32; 2]>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            colors: BTreeMap::new(),
            alignment: AlignmentConfig::default(),
            margins: Margins::default(),
            paginate: true,
            min_page_size: None,
            max_page_size: None,
        }
    }
}

/// Built-in colors used when a bucket is not configured.
fn builtin_colors(bucket: &str) -> Option<(Color, Color)> {
    match bucket {
        HEADER_BUCKET => Some((Color::new(0x80, 0x80, 0x80), Color::new(0xF5, 0xF5, 0xF5))),
        GRAND_TOTAL_BUCKET => Some((Color::new(0xFF, 0xFF, 0x00), Color::black())),
        DEFAULT_BUCKET => Some((Color::white(), Color::black())),
        _ => None,
    }
}

impl StyleConfig {
    /// Resolves the style for a bucket.
    ///
    /// Lookup order: the bucket itself, then `subtotal` for `subtotal_<n>`
    /// buckets, then the bucket's built-in colors, then `default`.
    /// Unknown buckets therefore end up with the default style.
    pub fn resolve(&self, bucket: &str) -> Result<CellStyle, StyleError> {
        let bold = bucket == HEADER_BUCKET;

        let mut chain: Vec<&str> = vec![bucket];
        if bucket.starts_with("subtotal_") {
            chain.push(SUBTOTAL_BUCKET);
        }

        for key in &chain {
            if let Some(pair) = self.colors.get(*key) {
                return self.parse_pair(key, pair, bold);
            }
        }

        if let Some((background, text_color)) = builtin_colors(bucket) {
            return Ok(CellStyle { background, text_color, bold });
        }

        if let Some(pair) = self.colors.get(DEFAULT_BUCKET) {
            return self.parse_pair(DEFAULT_BUCKET, pair, bold);
        }

        Ok(CellStyle {
            background: Color::white(),
            text_color: Color::black(),
            bold,
        })
    }

    /// Parses every configured color so a bad entry fails before any output
    /// is written.
    pub fn validate(&self) -> Result<(), StyleError> {
        for (bucket, pair) in &self.colors {
            self.parse_pair(bucket, pair, false)?;
        }
        Ok(())
    }

    fn parse_pair(&self, bucket: &str, pair: &ColorPair, bold: bool) -> Result<CellStyle, StyleError> {
        let parse = |value: &str| {
            Color::from_hex(value).ok_or_else(|| StyleError::InvalidColor {
                bucket: bucket.to_string(),
                value: value.to_string(),
            })
        };
        Ok(CellStyle {
            background: parse(&pair.background)?,
            text_color: parse(&pair.text)?,
            bold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#FF0000").unwrap();
        assert_eq!(color, Color::new(255, 0, 0));

        let color2 = Color::from_hex("00FF00").unwrap();
        assert_eq!(color2.g, 255);

        // Spreadsheet-style ARGB drops the alpha byte
        let color3 = Color::from_hex("FF0000FF").unwrap();
        assert_eq!(color3, Color::new(0, 0, 255));

        assert!(Color::from_hex("blue").is_none());
    }

    #[test]
    fn test_rgb_packing() {
        assert_eq!(Color::new(0x12, 0x34, 0x56).to_rgb_u32(), 0x123456);
        assert_eq!(Color::white().to_unit_rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_alignment_parse_is_case_insensitive() {
        assert_eq!("CENTER".parse::<TextAlign>().unwrap(), TextAlign::Center);
        assert_eq!("Right".parse::<TextAlign>().unwrap(), TextAlign::Right);
        assert!("diagonal".parse::<TextAlign>().is_err());
    }

    #[test]
    fn test_subtotal_level_falls_back_to_subtotal_then_default() {
        let mut config = StyleConfig::default();
        config.colors.insert("default".into(), ColorPair::new("FFFFFF", "000000"));
        config.colors.insert("subtotal".into(), ColorPair::new("D3D3D3", "000000"));
        config.colors.insert("subtotal_2".into(), ColorPair::new("ADD8E6", "000000"));

        let level2 = config.resolve("subtotal_2").unwrap();
        assert_eq!(level2.background, Color::new(0xAD, 0xD8, 0xE6));

        let level1 = config.resolve("subtotal_1").unwrap();
        assert_eq!(level1.background, Color::new(0xD3, 0xD3, 0xD3));

        config.colors.remove("subtotal");
        let level1 = config.resolve("subtotal_1").unwrap();
        assert_eq!(level1.background, Color::white());
    }

    #[test]
    fn test_header_is_bold_with_builtin_colors() {
        let config = StyleConfig::default();
        let header = config.resolve(HEADER_BUCKET).unwrap();
        assert!(header.bold);
        assert_eq!(header.background, Color::new(0x80, 0x80, 0x80));
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let mut config = StyleConfig::default();
        config.colors.insert("grand_total".into(), ColorPair::new("yellowish", "000000"));
        assert!(config.validate().is_err());
        assert!(matches!(
            config.resolve(GRAND_TOTAL_BUCKET),
            Err(StyleError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_alignment_resolution_falls_back_to_global() {
        let alignment = AlignmentConfig {
            global: Some(TextAlign::Center),
            header: None,
            content: ContentAlignment {
                numbers: Some(TextAlign::Right),
                text: None,
                subtotal: None,
            },
        };
        assert_eq!(alignment.resolve(CellKind::Number), TextAlign::Right);
        assert_eq!(alignment.resolve(CellKind::Text), TextAlign::Center);
        assert_eq!(alignment.resolve(CellKind::Header), TextAlign::Center);
        assert_eq!(AlignmentConfig::default().resolve(CellKind::Text), TextAlign::Left);
    }

    #[test]
    fn test_style_config_deserializes_with_defaults() {
        let json = r#"{
            "colors": {"header": {"background": "4F81BD", "text": "FFFFFF"}},
            "alignment": {"global": "CENTER", "header": "center",
                          "content": {"numbers": "RIGHT", "text": "LEFT", "subtotal": "CENTER"}}
        }"#;
        let config: StyleConfig = serde_json::from_str(json).unwrap();
        assert!(config.paginate);
        assert_eq!(config.margins, Margins::default());
        assert_eq!(config.alignment.content.numbers, Some(TextAlign::Right));
        assert_eq!(config.resolve("header").unwrap().background, Color::new(0x4F, 0x81, 0xBD));
    }
}
