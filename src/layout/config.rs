//! Layout configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::constants::*;
use crate::markup::Language;

/// A font family, size and fill color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFont {
    pub family: String,
    pub size: f64,
    pub color: String,
}

impl TextFont {
    pub fn new(family: impl Into<String>, size: f64, color: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            size,
            color: color.into(),
        }
    }
}

/// Page geometry, fonts and spacing used when laying out a document.
///
/// Every field has a default, so a host can deserialize a partial JSON
/// object and override only what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,

    /// Neume font configuration name (its `family_name`)
    pub neume_font: String,
    pub neume_font_size: f64,
    pub neume_color: String,

    pub lyric_font: TextFont,
    /// Distance from the neume baseline down to the lyric baseline
    pub lyric_top_margin: f64,

    pub dropcap_font: TextFont,
    pub heading_font: TextFont,
    /// Font of the martyria in mode headings
    pub mode_font: TextFont,
    pub language: Language,

    pub paragraph_font: TextFont,
    /// Font size per paragraph style; unlisted styles use `paragraph_font.size`
    pub paragraph_styles: BTreeMap<String, f64>,

    pub syllable_spacing: f64,
    pub line_leading: f64,
    pub line_spacing: f64,
    pub block_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let paragraph_styles = [("h1", 20.0), ("h2", HEADING_FONT_SIZE), ("h3", 14.0)]
            .into_iter()
            .map(|(style, size)| (style.to_string(), size))
            .collect();

        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            margin_left: PAGE_MARGIN_LEFT,
            margin_right: PAGE_MARGIN_RIGHT,
            margin_top: PAGE_MARGIN_TOP,
            margin_bottom: PAGE_MARGIN_BOTTOM,
            neume_font: NEUME_FONT.to_string(),
            neume_font_size: NEUME_FONT_SIZE,
            neume_color: NEUME_COLOR.to_string(),
            lyric_font: TextFont::new(LYRIC_FONT, LYRIC_FONT_SIZE, LYRIC_COLOR),
            lyric_top_margin: LYRIC_TOP_MARGIN,
            dropcap_font: TextFont::new(LYRIC_FONT, DROPCAP_FONT_SIZE, DROPCAP_COLOR),
            heading_font: TextFont::new(LYRIC_FONT, HEADING_FONT_SIZE, HEADING_COLOR),
            mode_font: TextFont::new(MODE_FONT, MODE_FONT_SIZE, HEADING_COLOR),
            language: Language::default(),
            paragraph_font: TextFont::new(LYRIC_FONT, PARAGRAPH_FONT_SIZE, TEXT_COLOR),
            paragraph_styles,
            syllable_spacing: SYLLABLE_SPACING,
            line_leading: LINE_LEADING,
            line_spacing: LINE_SPACING,
            block_spacing: BLOCK_SPACING,
        }
    }
}

impl LayoutConfig {
    /// Right edge of the content area.
    pub fn content_right(&self) -> f64 {
        self.page_width - self.margin_right
    }

    /// Font for a paragraph of the given style.
    pub fn paragraph_font_for(&self, style: &str) -> TextFont {
        let mut font = self.paragraph_font.clone();
        if let Some(size) = self.paragraph_styles.get(style) {
            font.size = *size;
        }
        font
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"page_width": 400.0}"#).unwrap();
        assert_eq!(config.page_width, 400.0);
        assert_eq!(config.neume_font, NEUME_FONT);
        assert_eq!(config.content_right(), 400.0 - PAGE_MARGIN_RIGHT);
    }

    #[test]
    fn paragraph_style_sizes() {
        let config = LayoutConfig::default();
        assert_eq!(config.paragraph_font_for("h1").size, 20.0);
        assert_eq!(config.paragraph_font_for("body").size, PARAGRAPH_FONT_SIZE);
    }
}
