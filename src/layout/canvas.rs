//! Drawing capability used by syllables and lines.

use serde::Serialize;

/// A surface positioned drawing instructions are issued against.
///
/// Coordinates share the space of the layout anchors.
pub trait Canvas {
    fn save_state(&mut self);
    fn restore_state(&mut self);
    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn set_font(&mut self, family: &str, size: f64);
    /// Text whose left edge starts at `x`.
    fn draw_string(&mut self, x: f64, y: f64, text: &str);
    /// Text horizontally centered on `x`.
    fn draw_centred_string(&mut self, x: f64, y: f64, text: &str);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    SaveState,
    RestoreState,
    FillColor { color: String },
    StrokeColor { color: String },
    Font { family: String, size: f64 },
    Text { x: f64, y: f64, text: String },
    CentredText { x: f64, y: f64, text: String },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

/// A canvas that records every call, for hosts that draw with their own
/// backend and for inspecting layout output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// All line segments, as `(x1, y1, x2, y2)`.
    pub fn lines(&self) -> Vec<(f64, f64, f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match *c {
                DrawCommand::Line { x1, y1, x2, y2 } => Some((x1, y1, x2, y2)),
                _ => None,
            })
            .collect()
    }

    /// All centered strings, as `(x, y, text)`.
    pub fn centred_strings(&self) -> Vec<(f64, f64, &str)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::CentredText { x, y, text } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// All left-aligned strings, as `(x, y, text)`.
    pub fn strings(&self) -> Vec<(f64, f64, &str)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, y, text } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Replay the recorded commands onto another canvas.
    pub fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for command in &self.commands {
            match command {
                DrawCommand::SaveState => canvas.save_state(),
                DrawCommand::RestoreState => canvas.restore_state(),
                DrawCommand::FillColor { color } => canvas.set_fill_color(color),
                DrawCommand::StrokeColor { color } => canvas.set_stroke_color(color),
                DrawCommand::Font { family, size } => canvas.set_font(family, *size),
                DrawCommand::Text { x, y, text } => canvas.draw_string(*x, *y, text),
                DrawCommand::CentredText { x, y, text } => canvas.draw_centred_string(*x, *y, text),
                DrawCommand::Line { x1, y1, x2, y2 } => canvas.line(*x1, *y1, *x2, *y2),
            }
        }
    }
}

impl Canvas for DisplayList {
    fn save_state(&mut self) {
        self.commands.push(DrawCommand::SaveState);
    }

    fn restore_state(&mut self) {
        self.commands.push(DrawCommand::RestoreState);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillColor { color: color.to_string() });
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeColor { color: color.to_string() });
    }

    fn set_font(&mut self, family: &str, size: f64) {
        self.commands.push(DrawCommand::Font {
            family: family.to_string(),
            size,
        });
    }

    fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn draw_centred_string(&mut self, x: f64, y: f64, text: &str) {
        self.commands.push(DrawCommand::CentredText {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2 });
    }
}
