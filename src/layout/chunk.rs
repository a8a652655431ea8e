//! Glyph chunks — a base neume and the marks attached to it, laid out as
//! one unit.

use serde::Serialize;

use crate::error::LayoutError;
use crate::fonts::{FontProvider, GlyphCategory};

/// A glyph token resolved against a font.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Glyph {
    pub name: String,
    /// Characters to draw
    pub text: String,
    pub family: String,
    pub size: f64,
    pub color: String,
    /// Advance width at `size`
    pub width: f64,
    /// Ascent minus descent of `family` at `size`
    pub height: f64,
    pub standalone: bool,
    pub takes_lyric: bool,
    pub keep_with_next: bool,
    pub category: GlyphCategory,
    pub lyric_offset: f64,
}

impl Glyph {
    /// Resolve `token` from the neume font `neume_font`.
    pub fn resolve<P: FontProvider + ?Sized>(
        provider: &P,
        token: &str,
        neume_font: &str,
        size: f64,
        color: &str,
    ) -> Result<Self, LayoutError> {
        let class = provider.classify(token, neume_font)?;
        let width = provider.string_width(&class.text, &class.family, size)?;
        let (ascent, descent) = provider.ascent_descent(&class.family, size)?;

        Ok(Self {
            name: class.name,
            text: class.text,
            family: class.family,
            size,
            color: color.to_string(),
            width,
            height: ascent - descent,
            standalone: class.standalone,
            takes_lyric: class.takes_lyric,
            keep_with_next: class.keep_with_next,
            category: class.category,
            lyric_offset: class.lyric_offset,
        })
    }
}

/// An ordered group of glyphs drawn as one notational unit.
///
/// `width` is the sum of the standalone members and is recomputed on every
/// insertion. `height` is fixed by the first glyph inserted. The base glyph
/// is fixed once it can be determined: a leading keep-with-next glyph defers
/// the choice until a second glyph arrives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlyphChunk {
    glyphs: Vec<Glyph>,
    width: f64,
    height: f64,
    base: Option<usize>,
}

impl GlyphChunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, glyph: Glyph) {
        if self.glyphs.is_empty() {
            self.height = glyph.height;
        }
        self.glyphs.push(glyph);
        self.recompute_width();
        self.assign_base_glyph();
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Glyph> {
        self.glyphs.iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The glyph the chunk is categorized and anchored by.
    pub fn base_glyph(&self) -> Option<&Glyph> {
        match self.base {
            Some(i) => self.glyphs.get(i),
            None => self.glyphs.first(),
        }
    }

    /// Whether some member can carry a lyric.
    pub fn takes_lyric(&self) -> bool {
        self.glyphs.iter().any(|g| g.takes_lyric)
    }

    /// Lyric offset of the base glyph.
    pub fn lyric_offset(&self) -> Result<f64, LayoutError> {
        self.base_glyph()
            .map(|g| g.lyric_offset)
            .ok_or(LayoutError::EmptyChunk)
    }

    fn recompute_width(&mut self) {
        self.width = self
            .glyphs
            .iter()
            .filter(|g| g.standalone)
            .map(|g| g.width)
            .sum();
    }

    fn assign_base_glyph(&mut self) {
        if self.base.is_some() {
            return;
        }
        self.base = match self.glyphs.as_slice() {
            [] => None,
            [only] if only.keep_with_next => None,
            [first, _, ..] if first.keep_with_next => Some(1),
            _ => Some(0),
        };
    }
}

impl FromIterator<Glyph> for GlyphChunk {
    fn from_iter<I: IntoIterator<Item = Glyph>>(iter: I) -> Self {
        let mut chunk = GlyphChunk::new();
        for glyph in iter {
            chunk.push(glyph);
        }
        chunk
    }
}

impl<'a> IntoIterator for &'a GlyphChunk {
    type Item = &'a Glyph;
    type IntoIter = std::slice::Iter<'a, Glyph>;

    fn into_iter(self) -> Self::IntoIter {
        self.glyphs.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn glyph(name: &str, width: f64, standalone: bool) -> Glyph {
        Glyph {
            name: name.to_string(),
            text: name.to_string(),
            family: "Neumes Main".to_string(),
            size: 20.0,
            color: "#000000".to_string(),
            width,
            height: 24.0,
            standalone,
            takes_lyric: standalone,
            keep_with_next: false,
            category: GlyphCategory::Ordinary,
            lyric_offset: 0.0,
        }
    }

    fn keep_with_next(name: &str) -> Glyph {
        Glyph {
            keep_with_next: true,
            ..glyph(name, 6.0, true)
        }
    }

    #[test]
    fn width_counts_only_standalone_glyphs() {
        let chunk: GlyphChunk = [glyph("a", 10.0, true), glyph("b", 5.0, false)]
            .into_iter()
            .collect();
        assert_eq!(chunk.width(), 10.0);
    }

    #[test]
    fn height_fixed_by_first_glyph() {
        let mut chunk = GlyphChunk::new();
        chunk.push(glyph("a", 10.0, true));
        chunk.push(Glyph {
            height: 99.0,
            ..glyph("b", 10.0, true)
        });
        assert_eq!(chunk.height(), 24.0);
        assert_eq!(chunk.width(), 20.0);
    }

    #[test]
    fn keep_with_next_defers_base_to_second_glyph() {
        let chunk: GlyphChunk = [keep_with_next("A"), glyph("B", 10.0, true), glyph("C", 3.0, false)]
            .into_iter()
            .collect();
        assert_eq!(chunk.base_glyph().unwrap().name, "B");
    }

    #[test]
    fn ordinary_first_glyph_is_base() {
        let chunk: GlyphChunk = [glyph("A", 10.0, true), keep_with_next("B")].into_iter().collect();
        assert_eq!(chunk.base_glyph().unwrap().name, "A");
    }

    #[test]
    fn lone_glyph_is_base_even_if_keep_with_next() {
        let chunk: GlyphChunk = [keep_with_next("A")].into_iter().collect();
        assert_eq!(chunk.base_glyph().unwrap().name, "A");
        let chunk: GlyphChunk = [glyph("A", 1.0, true)].into_iter().collect();
        assert_eq!(chunk.base_glyph().unwrap().name, "A");
    }

    #[test]
    fn takes_lyric_if_any_member_does() {
        let chunk: GlyphChunk = [glyph("a", 5.0, false), glyph("b", 5.0, true)].into_iter().collect();
        assert!(chunk.takes_lyric());
        let chunk: GlyphChunk = [glyph("a", 5.0, false)].into_iter().collect();
        assert!(!chunk.takes_lyric());
    }

    #[test]
    fn empty_chunk_has_no_lyric_offset() {
        assert_eq!(GlyphChunk::new().lyric_offset(), Err(LayoutError::EmptyChunk));
        assert!(GlyphChunk::new().base_glyph().is_none());
    }
}
