//! Lyrics and the connectors that join them.

use serde::{Deserialize, Serialize};

use super::config::TextFont;
use crate::error::LayoutError;
use crate::fonts::FontProvider;

/// How a lyric connects to the syllables after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connector {
    #[default]
    None,
    /// Hyphen between syllables of one word
    Dash,
    /// Underscore line under a melisma
    Extender,
}

impl Connector {
    /// Split a trailing connector marker (`-` or `_`) off notation lyric text.
    pub fn split_lyric(text: &str) -> (&str, Connector) {
        if let Some(stem) = text.strip_suffix('-') {
            (stem, Connector::Dash)
        } else if let Some(stem) = text.strip_suffix('_') {
            (stem, Connector::Extender)
        } else {
            (text, Connector::None)
        }
    }

    pub fn is_some(self) -> bool {
        self != Connector::None
    }
}

/// Lyric text with its font and measured size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lyric {
    pub text: String,
    pub font: TextFont,
    pub top_margin: f64,
    pub connector: Connector,
    width: f64,
    height: f64,
    space_width: f64,
}

impl Lyric {
    pub fn new<P: FontProvider + ?Sized>(
        provider: &P,
        text: impl Into<String>,
        font: &TextFont,
        top_margin: f64,
        connector: Connector,
    ) -> Result<Self, LayoutError> {
        let text = text.into();
        let width = if text.is_empty() {
            0.0
        } else {
            provider.string_width(&text, &font.family, font.size)?
        };
        let (ascent, descent) = provider.ascent_descent(&font.family, font.size)?;
        let space_width = provider.string_width(" ", &font.family, font.size)?;

        Ok(Self {
            text,
            font: font.clone(),
            top_margin,
            connector,
            width,
            height: ascent - descent,
            space_width,
        })
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width of a space in this lyric's font.
    pub fn space_width(&self) -> f64 {
        self.space_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FontFace, FontTable};

    fn table() -> FontTable {
        let mut table = FontTable::new();
        table.register_face("Serif", FontFace::new(1000.0, 800.0, -200.0, 500.0).with_advance(' ', 250.0));
        table
    }

    #[test]
    fn split_connector_markers() {
        assert_eq!(Connector::split_lyric("Κύ-"), ("Κύ", Connector::Dash));
        assert_eq!(Connector::split_lyric("ε_"), ("ε", Connector::Extender));
        assert_eq!(Connector::split_lyric("ri"), ("ri", Connector::None));
        assert_eq!(Connector::split_lyric(""), ("", Connector::None));
    }

    #[test]
    fn measures_text_height_and_space() {
        let font = TextFont::new("Serif", 10.0, "#000");
        let lyric = Lyric::new(&table(), "la", &font, 16.0, Connector::Dash).unwrap();
        assert_eq!(lyric.width(), 10.0);
        assert_eq!(lyric.height(), 10.0);
        assert_eq!(lyric.space_width(), 2.5);
    }

    #[test]
    fn empty_text_has_zero_width() {
        let font = TextFont::new("Serif", 10.0, "#000");
        let lyric = Lyric::new(&table(), "", &font, 16.0, Connector::None).unwrap();
        assert_eq!(lyric.width(), 0.0);
        assert!(!lyric.has_text());
    }

    #[test]
    fn unknown_font_fails() {
        let font = TextFont::new("Missing", 10.0, "#000");
        assert_eq!(
            Lyric::new(&table(), "la", &font, 0.0, Connector::None),
            Err(LayoutError::UnknownFont("Missing".into()))
        );
    }
}
