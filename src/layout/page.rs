//! Page layout — turns a parsed Document into positioned lines and text.
//!
//! Scores are resolved glyph by glyph through the [`FontProvider`], packed
//! left to right into lines that fit the content width, and stacked down the
//! page together with mode headings, dropcaps and paragraphs.

use log::debug;
use serde::Serialize;

use super::canvas::Canvas;
use super::chunk::{Glyph, GlyphChunk};
use super::config::{LayoutConfig, TextFont};
use super::constants::DROPCAP_GAP;
use super::line::SyllableLine;
use super::lyric::{Connector, Lyric};
use super::syllable::Syllable;
use super::Coord;
use crate::error::LayoutError;
use crate::fonts::FontProvider;
use crate::model::{self, Block, Document, Paragraph, Score};

/// A positioned document, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLayout {
    pub items: Vec<LayoutItem>,
    /// Bottom of the last item plus the bottom margin
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutItem {
    Text { pos: Coord, text: String, font: TextFont },
    Line(SyllableLine),
}

impl DocumentLayout {
    pub fn lines(&self) -> impl Iterator<Item = &SyllableLine> {
        self.items.iter().filter_map(|item| match item {
            LayoutItem::Line(line) => Some(line),
            LayoutItem::Text { .. } => None,
        })
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for item in &self.items {
            match item {
                LayoutItem::Text { pos, text, font } => {
                    canvas.save_state();
                    canvas.set_fill_color(&font.color);
                    canvas.set_font(&font.family, font.size);
                    canvas.draw_string(pos.x, pos.y, text);
                    canvas.restore_state();
                }
                LayoutItem::Line(line) => line.draw(canvas),
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Syllable construction
// ═══════════════════════════════════════════════════════════════════════

/// Resolve a notation syllable's glyph tokens into a chunk.
pub fn build_chunk<P: FontProvider + ?Sized>(
    provider: &P,
    syllable: &model::Syllable,
    config: &LayoutConfig,
) -> Result<GlyphChunk, LayoutError> {
    let mut chunk = GlyphChunk::new();
    for token in &syllable.neumes {
        chunk.push(Glyph::resolve(
            provider,
            token,
            &config.neume_font,
            config.neume_font_size,
            &config.neume_color,
        )?);
    }
    Ok(chunk)
}

/// Build unpositioned layout syllables for a score.
///
/// A trailing `-` or `_` on the lyric text sets the connector. A syllable
/// without lyric text continues the connector of the syllable before it.
/// When the score has a dropcap, its letter is removed from the first lyric.
pub fn build_syllables<P: FontProvider + ?Sized>(
    provider: &P,
    score: &Score,
    config: &LayoutConfig,
) -> Result<Vec<Syllable>, LayoutError> {
    let mut syllables = Vec::with_capacity(score.syllables().len());
    let mut carried = Connector::None;

    for (i, notation) in score.syllables().iter().enumerate() {
        let (mut text, mut connector) = Connector::split_lyric(&notation.text);
        if i == 0 && score.dropcap_letter().is_some() {
            let mut chars = text.chars();
            chars.next();
            text = chars.as_str();
        }
        if notation.text.is_empty() {
            connector = carried;
        }
        carried = connector;

        let chunk = build_chunk(provider, notation, config)?;
        let lyric = Lyric::new(
            provider,
            text,
            &config.lyric_font,
            config.lyric_top_margin,
            connector,
        )?;
        syllables.push(Syllable::new(chunk, Coord::default(), Some(lyric), Coord::default())?);
    }

    Ok(syllables)
}

// ═══════════════════════════════════════════════════════════════════════
// Page layout
// ═══════════════════════════════════════════════════════════════════════

/// Lay out every block of a document down a single page.
pub fn layout_document<P: FontProvider + ?Sized>(
    provider: &P,
    document: &Document,
    config: &LayoutConfig,
) -> Result<DocumentLayout, LayoutError> {
    let mut items = Vec::new();
    let mut y = config.margin_top;

    for block in document.blocks() {
        y = match block {
            Block::Score(score) => layout_score(provider, score, config, y, &mut items)?,
            Block::Paragraph(para) => layout_paragraph(provider, para, config, y, &mut items)?,
        };
        y += config.block_spacing;
    }

    Ok(DocumentLayout {
        items,
        height: y + config.margin_bottom,
    })
}

/// Lay out one score starting at `top`; returns the y below it.
fn layout_score<P: FontProvider + ?Sized>(
    provider: &P,
    score: &Score,
    config: &LayoutConfig,
    top: f64,
    items: &mut Vec<LayoutItem>,
) -> Result<f64, LayoutError> {
    let mut y = top;

    if let Some(mode) = score.mode() {
        y = layout_mode_heading(provider, score, mode, config, y, items)?;
    }

    let syllables = build_syllables(provider, score, config)?;
    let ascent = match syllables.first().and_then(|s| s.chunk().glyphs().first()) {
        Some(glyph) => provider.ascent_descent(&glyph.family, glyph.size)?.0,
        None => config.neume_font_size,
    };

    let mut baseline = y + ascent;
    let mut indent = 0.0;
    if let Some(letter) = score.dropcap_letter() {
        let text = letter.to_string();
        let font = &config.dropcap_font;
        indent = provider.string_width(&text, &font.family, font.size)? + DROPCAP_GAP;
        items.push(LayoutItem::Text {
            pos: Coord::new(config.margin_left, baseline + config.lyric_top_margin),
            text,
            font: font.clone(),
        });
    }

    let right = config.content_right();
    let mut line = SyllableLine::new(config.line_leading);
    let mut x = config.margin_left + indent;

    for mut syllable in syllables {
        if !line.is_empty() && x + syllable.width() > right {
            debug!("line of {} syllables at y={baseline:.1}", line.len());
            let height = line.height();
            items.push(LayoutItem::Line(std::mem::replace(
                &mut line,
                SyllableLine::new(config.line_leading),
            )));
            baseline += height + config.line_spacing;
            x = config.margin_left;
        }

        let chunk_pos = Coord::new(x, baseline);
        let lyric_pos = lyric_anchor(&syllable, chunk_pos, config);
        syllable.place(chunk_pos, lyric_pos);
        x += syllable.width() + config.syllable_spacing;
        line.push(syllable);
    }

    let height = line.height();
    if !line.is_empty() {
        debug!("line of {} syllables at y={baseline:.1}", line.len());
        items.push(LayoutItem::Line(line));
    }

    Ok(baseline - ascent + height)
}

/// Center the lyric under the chunk unless the base glyph pins it with an offset.
fn lyric_anchor(syllable: &Syllable, chunk_pos: Coord, config: &LayoutConfig) -> Coord {
    let y = chunk_pos.y + config.lyric_top_margin;
    let offset = syllable.lyric_offset();
    if offset != 0.0 {
        return Coord::new(chunk_pos.x + offset, y);
    }
    let lyric_width = syllable.lyric().map_or(0.0, Lyric::width);
    Coord::new(chunk_pos.x + (syllable.width() - lyric_width) / 2.0, y)
}

fn layout_mode_heading<P: FontProvider + ?Sized>(
    provider: &P,
    score: &Score,
    mode: model::Mode,
    config: &LayoutConfig,
    top: f64,
    items: &mut Vec<LayoutItem>,
) -> Result<f64, LayoutError> {
    let heading = &config.heading_font;
    let glyph_font = &config.mode_font;
    let (ascent, descent) = provider.ascent_descent(&glyph_font.family, glyph_font.size)?;
    let baseline = top + ascent;

    let term = config.language.mode_term().trim().to_string();
    let space = provider.string_width(" ", &heading.family, heading.size)?;
    let term_width = provider.string_width(&term, &heading.family, heading.size)?;
    let glyph_width = provider.string_width(mode.glyph(), &glyph_font.family, glyph_font.size)?;

    let mut pieces = vec![
        (term, heading.clone(), term_width),
        (mode.glyph().to_string(), glyph_font.clone(), glyph_width),
    ];
    if let Some(base) = score.mode_base() {
        let width = provider.string_width(base, &heading.family, heading.size)?;
        pieces.push((base.to_string(), heading.clone(), width));
    }

    let total: f64 = pieces.iter().map(|(_, _, w)| w).sum::<f64>() + space * (pieces.len() - 1) as f64;
    let mut x = config.margin_left + (config.content_right() - config.margin_left - total) / 2.0;
    for (text, font, width) in pieces {
        items.push(LayoutItem::Text {
            pos: Coord::new(x, baseline),
            text,
            font,
        });
        x += width + space;
    }

    Ok(baseline - descent + config.line_spacing)
}

fn layout_paragraph<P: FontProvider + ?Sized>(
    provider: &P,
    para: &Paragraph,
    config: &LayoutConfig,
    top: f64,
    items: &mut Vec<LayoutItem>,
) -> Result<f64, LayoutError> {
    let font = config.paragraph_font_for(&para.style);
    let (ascent, descent) = provider.ascent_descent(&font.family, font.size)?;
    let baseline = top + ascent;
    items.push(LayoutItem::Text {
        pos: Coord::new(config.margin_left, baseline),
        text: para.content.clone(),
        font,
    });
    Ok(baseline - descent)
}
