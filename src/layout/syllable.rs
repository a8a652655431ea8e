//! Layout syllables — a glyph chunk and an optional lyric, positioned.

use serde::Serialize;

use super::canvas::Canvas;
use super::chunk::{Glyph, GlyphChunk};
use super::lyric::{Connector, Lyric};
use super::Coord;
use crate::error::LayoutError;
use crate::fonts::GlyphCategory;

/// Category of a syllable, from its base glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyllableCategory {
    Martyria,
    Ordinary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Syllable {
    chunk: GlyphChunk,
    base: Glyph,
    chunk_pos: Coord,
    lyric: Option<Lyric>,
    lyric_pos: Coord,
    width: f64,
    height: f64,
    category: SyllableCategory,
}

impl Syllable {
    /// Build a syllable. The chunk must contain at least one glyph.
    pub fn new(
        chunk: GlyphChunk,
        chunk_pos: Coord,
        lyric: Option<Lyric>,
        lyric_pos: Coord,
    ) -> Result<Self, LayoutError> {
        let base = chunk.base_glyph().cloned().ok_or(LayoutError::EmptyChunk)?;
        let category = match base.category {
            GlyphCategory::Martyria => SyllableCategory::Martyria,
            _ => SyllableCategory::Ordinary,
        };

        let lyric_width = lyric.as_ref().map_or(0.0, Lyric::width);
        let lyric_height = lyric.as_ref().map_or(0.0, Lyric::height);

        Ok(Self {
            width: chunk.width().max(lyric_width),
            height: chunk.height() + lyric_height,
            chunk,
            base,
            chunk_pos,
            lyric,
            lyric_pos,
            category,
        })
    }

    /// Move the syllable; sizes are unaffected.
    pub fn place(&mut self, chunk_pos: Coord, lyric_pos: Coord) {
        self.chunk_pos = chunk_pos;
        self.lyric_pos = lyric_pos;
    }

    pub fn chunk(&self) -> &GlyphChunk {
        &self.chunk
    }

    pub fn chunk_pos(&self) -> Coord {
        self.chunk_pos
    }

    pub fn lyric(&self) -> Option<&Lyric> {
        self.lyric.as_ref()
    }

    pub fn lyric_pos(&self) -> Coord {
        self.lyric_pos
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn category(&self) -> SyllableCategory {
        self.category
    }

    pub fn base_glyph(&self) -> &Glyph {
        &self.base
    }

    pub fn lyric_offset(&self) -> f64 {
        self.base_glyph().lyric_offset
    }

    pub fn takes_lyric(&self) -> bool {
        self.chunk.takes_lyric()
    }

    pub fn has_lyric_text(&self) -> bool {
        self.lyric.as_ref().is_some_and(Lyric::has_text)
    }

    pub fn has_connector(&self) -> bool {
        self.lyric.as_ref().is_some_and(|l| l.connector.is_some())
    }

    pub fn lyric_text_equals(&self, text: &str) -> bool {
        self.lyric.as_ref().is_some_and(|l| l.text == text)
    }

    pub fn connector_equals(&self, connector: Connector) -> bool {
        self.lyric.as_ref().is_some_and(|l| l.connector == connector)
    }

    /// Draw the glyphs left to right, then the lyric.
    ///
    /// Only standalone glyphs advance the pen, so combining marks are drawn
    /// over the glyph before them.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.save_state();
        let mut offset = 0.0;
        for (i, glyph) in self.chunk.iter().enumerate() {
            if i > 0 {
                let previous = &self.chunk.glyphs()[i - 1];
                if previous.standalone {
                    offset += previous.width;
                }
            }
            canvas.set_fill_color(&glyph.color);
            canvas.set_font(&glyph.family, glyph.size);
            canvas.draw_string(self.chunk_pos.x + offset, self.chunk_pos.y, &glyph.text);
        }
        canvas.restore_state();

        if let Some(lyric) = self.lyric.as_ref().filter(|l| l.has_text()) {
            canvas.save_state();
            canvas.set_fill_color(&lyric.font.color);
            canvas.set_font(&lyric.font.family, lyric.font.size);
            canvas.draw_string(self.lyric_pos.x, self.lyric_pos.y, &lyric.text);
            canvas.restore_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::DisplayList;
    use crate::layout::chunk::tests::glyph;
    use crate::layout::config::TextFont;
    use crate::fonts::{FontFace, FontTable};

    fn lyric(text: &str, connector: Connector) -> Lyric {
        let mut table = FontTable::new();
        table.register_face("Serif", FontFace::new(1000.0, 800.0, -200.0, 500.0));
        Lyric::new(&table, text, &TextFont::new("Serif", 10.0, "#111"), 16.0, connector).unwrap()
    }

    fn chunk(glyphs: Vec<Glyph>) -> GlyphChunk {
        glyphs.into_iter().collect()
    }

    #[test]
    fn empty_chunk_is_rejected() {
        assert_eq!(
            Syllable::new(GlyphChunk::new(), Coord::default(), None, Coord::default()),
            Err(LayoutError::EmptyChunk)
        );
    }

    #[test]
    fn size_combines_chunk_and_lyric() {
        let syl = Syllable::new(
            chunk(vec![glyph("a", 8.0, true)]),
            Coord::default(),
            Some(lyric("long", Connector::None)),
            Coord::default(),
        )
        .unwrap();
        assert_eq!(syl.width(), 20.0);
        assert_eq!(syl.height(), 24.0 + 10.0);

        let bare = Syllable::new(chunk(vec![glyph("a", 8.0, true)]), Coord::default(), None, Coord::default()).unwrap();
        assert_eq!(bare.width(), 8.0);
        assert_eq!(bare.height(), 24.0);
    }

    #[test]
    fn category_from_base_glyph() {
        let martyria = Glyph {
            category: GlyphCategory::Martyria,
            ..glyph("m", 8.0, true)
        };
        let syl = Syllable::new(chunk(vec![martyria]), Coord::default(), None, Coord::default()).unwrap();
        assert_eq!(syl.category(), SyllableCategory::Martyria);

        let accidental = Glyph {
            category: GlyphCategory::Accidental,
            ..glyph("f", 8.0, true)
        };
        let syl = Syllable::new(chunk(vec![accidental]), Coord::default(), None, Coord::default()).unwrap();
        assert_eq!(syl.category(), SyllableCategory::Ordinary);
    }

    #[test]
    fn base_glyph_follows_chunk_rule() {
        let bareia = Glyph {
            keep_with_next: true,
            ..glyph("bareia", 4.0, true)
        };
        let syl = Syllable::new(
            chunk(vec![bareia, glyph("oligon", 8.0, true)]),
            Coord::default(),
            None,
            Coord::default(),
        )
        .unwrap();
        assert_eq!(syl.base_glyph().name, "oligon");
    }

    #[test]
    fn predicates_are_null_safe() {
        let bare = Syllable::new(chunk(vec![glyph("a", 8.0, true)]), Coord::default(), None, Coord::default()).unwrap();
        assert!(!bare.has_lyric_text());
        assert!(!bare.has_connector());
        assert!(!bare.lyric_text_equals(""));
        assert!(!bare.connector_equals(Connector::None));

        let syl = Syllable::new(
            chunk(vec![glyph("a", 8.0, true)]),
            Coord::default(),
            Some(lyric("la", Connector::Dash)),
            Coord::default(),
        )
        .unwrap();
        assert!(syl.has_lyric_text());
        assert!(syl.has_connector());
        assert!(syl.lyric_text_equals("la"));
        assert!(syl.connector_equals(Connector::Dash));
    }

    #[test]
    fn draw_advances_only_past_standalone_glyphs() {
        let syl = Syllable::new(
            chunk(vec![
                glyph("a", 10.0, true),
                glyph("mark", 5.0, false),
                glyph("b", 7.0, true),
            ]),
            Coord::new(100.0, 50.0),
            Some(lyric("la", Connector::None)),
            Coord::new(101.0, 66.0),
        )
        .unwrap();
        let mut canvas = DisplayList::new();
        syl.draw(&mut canvas);
        let strings = canvas.strings();
        assert_eq!(
            strings,
            vec![
                (100.0, 50.0, "a"),
                (110.0, 50.0, "mark"),
                (110.0, 50.0, "b"),
                (101.0, 66.0, "la"),
            ]
        );
    }

    #[test]
    fn draw_skips_empty_lyric() {
        let syl = Syllable::new(
            chunk(vec![glyph("a", 10.0, true)]),
            Coord::default(),
            Some(lyric("", Connector::Extender)),
            Coord::default(),
        )
        .unwrap();
        let mut canvas = DisplayList::new();
        syl.draw(&mut canvas);
        assert_eq!(canvas.strings().len(), 1);
    }
}
