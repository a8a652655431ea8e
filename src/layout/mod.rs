//! Layout engine — glyph chunks, syllables, lines and their connectors.
//!
//! Layout objects are rebuilt for every rendering pass from resolved font
//! metrics and hold no identity beyond it. All font knowledge comes from the
//! [`FontProvider`](crate::fonts::FontProvider) passed in; all drawing goes
//! through a [`Canvas`].

mod constants;

pub mod canvas;
pub mod chunk;
pub mod config;
pub mod line;
pub mod lyric;
pub mod page;
pub mod svg_builder;
pub mod syllable;

use serde::Serialize;

use crate::error::LayoutError;
use crate::fonts::FontProvider;
use crate::model::Document;

pub use canvas::{Canvas, DisplayList, DrawCommand};
pub use chunk::{Glyph, GlyphChunk};
pub use config::{LayoutConfig, TextFont};
pub use line::SyllableLine;
pub use lyric::{Connector, Lyric};
pub use page::{layout_document, DocumentLayout, LayoutItem};
pub use svg_builder::SvgCanvas;
pub use syllable::{Syllable, SyllableCategory};

/// A position in page space (points, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Lay out a document and record the drawing commands.
pub fn render_document_to_display_list<P: FontProvider + ?Sized>(
    provider: &P,
    document: &Document,
    config: &LayoutConfig,
) -> Result<DisplayList, LayoutError> {
    let layout = layout_document(provider, document, config)?;
    let mut list = DisplayList::new();
    layout.draw(&mut list);
    Ok(list)
}

/// Lay out a document and draw it into a single SVG page.
pub fn render_document_to_svg<P: FontProvider + ?Sized>(
    provider: &P,
    document: &Document,
    config: &LayoutConfig,
) -> Result<String, LayoutError> {
    let layout = layout_document(provider, document, config)?;
    let mut svg = SvgCanvas::new();
    layout.draw(&mut svg);
    Ok(svg.build(config.page_width, layout.height))
}
