//! Syllable lines and the connector passes drawn across them.
//!
//! Two independent single passes run over a line after its syllables are
//! drawn: the dash pass hyphenates syllables of one word, and the extender
//! pass underlines lyrics held across several neumes.

use log::trace;
use serde::Serialize;

use super::canvas::Canvas;
use super::constants::{DASH, SYNECHES_ELAFRON};
use super::lyric::{Connector, Lyric};
use super::syllable::Syllable;
use super::Coord;

/// Syllables sharing one baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyllableLine {
    syllables: Vec<Syllable>,
    leading: f64,
    width: f64,
    height: f64,
}

/// Dash pass state.
enum DashState<'a> {
    /// Outside a hyphenated word
    Idle,
    /// Inside a word whose first lyric supplies the dash style
    InWord { starting: &'a Lyric },
}

/// An extender under construction.
struct Span<'a> {
    x1: f64,
    y: f64,
    /// End of the last glyph the extender runs under, once known
    x2: Option<f64>,
    starting: &'a Lyric,
}

/// Extender pass state.
enum ExtenderState<'a> {
    Idle,
    Open(Span<'a>),
}

impl SyllableLine {
    pub fn new(leading: f64) -> Self {
        Self {
            syllables: Vec::new(),
            leading,
            width: 0.0,
            height: leading,
        }
    }

    pub fn push(&mut self, syllable: Syllable) {
        self.syllables.push(syllable);
        self.set_size();
    }

    pub fn insert(&mut self, index: usize, syllable: Syllable) {
        self.syllables.insert(index, syllable);
        self.set_size();
    }

    pub fn remove(&mut self, index: usize) -> Syllable {
        let syllable = self.syllables.remove(index);
        self.set_size();
        syllable
    }

    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn set_size(&mut self) {
        let (Some(first), Some(last)) = (self.syllables.first(), self.syllables.last()) else {
            self.width = 0.0;
            self.height = self.leading;
            return;
        };
        self.width = last.chunk_pos().x + last.width() - first.chunk_pos().x;
        self.height = self
            .syllables
            .iter()
            .map(Syllable::height)
            .fold(self.leading, f64::max);
    }

    /// Draw every syllable, then the dashes, then the extenders.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for syllable in &self.syllables {
            syllable.draw(canvas);
        }
        self.draw_dashes(canvas);
        self.draw_extenders(canvas);
    }

    /// Draw a dash after each word-starting lyric and under each lyric-less
    /// continuation of the word.
    pub fn draw_dashes<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let mut state = DashState::Idle;

        for syllable in &self.syllables {
            let lyric = match syllable.lyric() {
                Some(lyric) if lyric.connector == Connector::Dash => lyric,
                _ => {
                    if matches!(state, DashState::InWord { .. }) {
                        trace!("dash: word ends");
                    }
                    state = DashState::Idle;
                    continue;
                }
            };

            let active = match state {
                DashState::InWord { starting } => starting,
                DashState::Idle => lyric,
            };

            let (starting, position) = if lyric.has_text() {
                trace!("dash: word starts at {:?}", lyric.text);
                (lyric, initial_dash_position(syllable, lyric))
            } else {
                (active, syllable.lyric_pos())
            };
            state = DashState::InWord { starting };

            if syllable.takes_lyric() {
                draw_dash(canvas, position, starting);
            }
        }
    }

    /// Draw extender lines under lyrics that continue across neumes.
    pub fn draw_extenders<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let mut state = ExtenderState::Idle;

        for (i, syllable) in self.syllables.iter().enumerate() {
            let Some(lyric) = syllable
                .lyric()
                .filter(|l| l.connector == Connector::Extender)
            else {
                if let ExtenderState::Open(span) = state {
                    if let Some(mut x2) = span.x2 {
                        if syllable.base_glyph().name == SYNECHES_ELAFRON {
                            x2 = special_extender_end(syllable);
                        }
                        trace!("extender: closed before syllable {i}");
                        draw_extender(canvas, span.x1, span.y, x2, span.starting);
                    }
                }
                state = ExtenderState::Idle;
                continue;
            };

            let mut span = match state {
                ExtenderState::Open(span) => span,
                ExtenderState::Idle => {
                    let x1 = if i == 0 && !lyric.has_text() {
                        syllable.chunk_pos().x
                    } else {
                        extender_start(syllable, lyric)
                    };
                    trace!("extender: opened at syllable {i}");
                    Span {
                        x1,
                        y: syllable.lyric_pos().y,
                        x2: None,
                        starting: lyric,
                    }
                }
            };

            if lyric.has_text() {
                if let Some(mut x2) = span.x2 {
                    if syllable.lyric_offset() != 0.0 {
                        x2 = special_extender_end(syllable);
                    }
                    draw_extender(canvas, span.x1, span.y, x2, span.starting);
                    span = Span {
                        x1: extender_start(syllable, lyric),
                        y: span.y,
                        x2: None,
                        starting: lyric,
                    };
                }
            }

            span.x2 = Some(if syllable.base_glyph().name == SYNECHES_ELAFRON {
                special_extender_end(syllable)
            } else {
                extender_end(syllable)
            });
            state = ExtenderState::Open(span);
        }

        if let ExtenderState::Open(Span { x1, y, x2: Some(x2), starting }) = state {
            trace!("extender: runs to end of line");
            draw_extender(canvas, x1, y, x2, starting);
        }
    }
}

/// After the lyric, plus two spaces.
fn initial_dash_position(syllable: &Syllable, lyric: &Lyric) -> Coord {
    let pos = syllable.lyric_pos();
    Coord::new(pos.x + lyric.width() + lyric.space_width() * 2.0, pos.y)
}

/// After the lyric, plus one space.
fn extender_start(syllable: &Syllable, lyric: &Lyric) -> f64 {
    syllable.lyric_pos().x + lyric.width() + lyric.space_width()
}

/// Right edge of the syllable's neumes.
fn extender_end(syllable: &Syllable) -> f64 {
    syllable.chunk_pos().x + syllable.chunk().width()
}

fn special_extender_end(syllable: &Syllable) -> f64 {
    syllable.chunk_pos().x + syllable.lyric_offset()
}

fn draw_dash<C: Canvas + ?Sized>(canvas: &mut C, position: Coord, style: &Lyric) {
    canvas.save_state();
    canvas.set_fill_color(&style.font.color);
    canvas.set_font(&style.font.family, style.font.size);
    canvas.draw_centred_string(position.x, position.y, DASH);
    canvas.restore_state();
}

fn draw_extender<C: Canvas + ?Sized>(canvas: &mut C, x1: f64, y: f64, x2: f64, style: &Lyric) {
    canvas.save_state();
    canvas.set_stroke_color(&style.font.color);
    canvas.set_font(&style.font.family, style.font.size);
    canvas.line(x1, y, x2, y);
    canvas.restore_state();
}
