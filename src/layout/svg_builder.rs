//! SVG canvas — accumulates SVG elements and produces the final string.

use super::canvas::Canvas;
use super::constants::EXTENDER_WIDTH;
use crate::markup::escape;

#[derive(Debug, Clone)]
struct GraphicsState {
    fill: String,
    stroke: String,
    family: String,
    size: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: "#000000".to_string(),
            stroke: "#000000".to_string(),
            family: "serif".to_string(),
            size: 12.0,
        }
    }
}

/// A [`Canvas`] that writes SVG elements.
pub struct SvgCanvas {
    elements: Vec<String>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Finish the document with the given page size.
    pub fn build(self, width: f64, height: f64) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.1} {:.1}" width="{:.1}" height="{:.1}">"#,
            width, height, width, height
        );
        svg.push('\n');
        svg.push_str(&format!(
            r#"  <rect x="0" y="0" width="{:.1}" height="{:.1}" fill="white"/>"#,
            width, height
        ));
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn text(&mut self, x: f64, y: f64, content: &str, anchor: &str) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="{}">{}</text>"#,
            x,
            y,
            escape(&self.state.family),
            self.state.size,
            escape(&self.state.fill),
            anchor,
            escape(content)
        ));
    }
}

impl Canvas for SvgCanvas {
    fn save_state(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_fill_color(&mut self, color: &str) {
        self.state.fill = color.to_string();
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.state.stroke = color.to_string();
    }

    fn set_font(&mut self, family: &str, size: f64) {
        self.state.family = family.to_string();
        self.state.size = size;
    }

    fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        self.text(x, y, text, "start");
    }

    fn draw_centred_string(&mut self, x: f64, y: f64, text: &str) {
        self.text(x, y, text, "middle");
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            x1,
            y1,
            x2,
            y2,
            escape(&self.state.stroke),
            EXTENDER_WIDTH
        ));
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_state_reverts_font_and_color() {
        let mut svg = SvgCanvas::new();
        svg.save_state();
        svg.set_fill_color("red");
        svg.set_font("Neumes", 20.0);
        svg.draw_string(1.0, 2.0, "x");
        svg.restore_state();
        svg.draw_centred_string(3.0, 4.0, "-");
        let out = svg.build(100.0, 50.0);
        assert!(out.contains(r#"font-family="Neumes" font-size="20.0" fill="red" text-anchor="start">x</text>"#));
        assert!(out.contains(r##"font-family="serif" font-size="12.0" fill="#000000" text-anchor="middle">-</text>"##));
    }

    #[test]
    fn text_is_escaped() {
        let mut svg = SvgCanvas::new();
        svg.draw_string(0.0, 0.0, "a<b");
        assert!(svg.build(10.0, 10.0).contains(">a&lt;b</text>"));
    }

    #[test]
    fn line_uses_stroke_color() {
        let mut svg = SvgCanvas::new();
        svg.set_stroke_color("#333333");
        svg.line(0.0, 5.0, 10.0, 5.0);
        assert_eq!(svg.len(), 1);
        assert!(svg
            .build(10.0, 10.0)
            .contains(r##"<line x1="0.0" y1="5.0" x2="10.0" y2="5.0" stroke="#333333""##));
    }
}
