//! Font metrics and glyph classification.
//!
//! Layout never touches a global font registry: everything it needs is asked
//! of a [`FontProvider`] passed in by the caller. [`FontTable`] is a simple
//! in-memory provider built from per-font metric tables and the
//! `glyphnames.yaml` / `classes.yaml` configuration that ships with each
//! neume font.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Metrics and glyph classes, as consumed by the layout engine.
///
/// Implementations must fail for fonts or glyphs they don't know rather
/// than report zero metrics.
pub trait FontProvider {
    /// Advance width of `text` set in `family` at `size`.
    fn string_width(&self, text: &str, family: &str, size: f64) -> Result<f64, LayoutError>;

    /// `(ascent, descent)` of `family` at `size`; descent is negative.
    fn ascent_descent(&self, family: &str, size: f64) -> Result<(f64, f64), LayoutError>;

    /// Classification of a glyph token in the neume font `neume_font`.
    fn classify(&self, token: &str, neume_font: &str) -> Result<GlyphClass, LayoutError>;
}

/// Broad category of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphCategory {
    Martyria,
    Accidental,
    TempoMarking,
    Chronos,
    Rest,
    Ordinary,
}

/// Everything a font configuration says about one glyph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphClass {
    /// Glyph name (the notation token)
    pub name: String,
    /// Characters drawn for this glyph
    pub text: String,
    /// Full font family the characters are set in
    pub family: String,
    /// Advances the pen; combining marks don't
    pub standalone: bool,
    /// A lyric may be attached to this glyph
    pub takes_lyric: bool,
    /// Binds to the following glyph (never a base glyph when followed)
    pub keep_with_next: bool,
    pub category: GlyphCategory,
    /// Horizontal lyric/extender anchor offset, 0 when unset
    pub lyric_offset: f64,
}

// ═══════════════════════════════════════════════════════════════════════
// Font configuration (glyphnames.yaml + classes.yaml)
// ═══════════════════════════════════════════════════════════════════════

/// One entry of `glyphnames.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlyphName {
    /// Sub-family the glyph lives in, e.g. "Main" or "Martyria"
    pub family: String,
    /// "U+E001", "0xE001", or the literal character(s)
    pub codepoint: String,
    #[serde(default)]
    pub component_glyphs: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `classes.yaml`: which glyphs belong to which class.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontClasses {
    pub family_name: String,
    pub takes_lyric: Vec<String>,
    pub standalone: Vec<String>,
    #[serde(default)]
    pub keep_with_next: Vec<String>,
    #[serde(default)]
    pub lyric_offsets: HashMap<String, f64>,
    #[serde(default)]
    pub accidentals: Vec<String>,
    #[serde(default)]
    pub martyriae: Vec<String>,
    #[serde(default)]
    pub tempo_markings: Vec<String>,
    #[serde(default)]
    pub chronos: Vec<String>,
    #[serde(default)]
    pub rests: Vec<String>,
}

/// Glyph names and classes of one neume font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub glyphnames: BTreeMap<String, GlyphName>,
    pub classes: FontClasses,
}

impl FontConfig {
    /// Load a configuration from the text of its two YAML files.
    pub fn from_yaml(glyphnames: &str, classes: &str) -> Result<Self, LayoutError> {
        let glyphnames: BTreeMap<String, GlyphName> = serde_yaml::from_str(glyphnames)
            .map_err(|e| LayoutError::Config(format!("glyphnames: {e}")))?;
        let classes: FontClasses = serde_yaml::from_str(classes)
            .map_err(|e| LayoutError::Config(format!("classes: {e}")))?;
        Ok(Self { glyphnames, classes })
    }

    pub fn family_name(&self) -> &str {
        &self.classes.family_name
    }

    /// Classify `token`, or `None` if the font has no such glyph.
    pub fn classify(&self, token: &str) -> Option<GlyphClass> {
        let entry = self.glyphnames.get(token)?;
        let classes = &self.classes;
        let listed = |list: &[String]| list.iter().any(|g| g == token);

        let category = if listed(&classes.martyriae) {
            GlyphCategory::Martyria
        } else if listed(&classes.accidentals) {
            GlyphCategory::Accidental
        } else if listed(&classes.tempo_markings) {
            GlyphCategory::TempoMarking
        } else if listed(&classes.chronos) {
            GlyphCategory::Chronos
        } else if listed(&classes.rests) {
            GlyphCategory::Rest
        } else {
            GlyphCategory::Ordinary
        };

        Some(GlyphClass {
            name: token.to_string(),
            text: self.glyph_text(entry)?,
            family: format!("{} {}", classes.family_name, entry.family),
            standalone: listed(&classes.standalone),
            takes_lyric: listed(&classes.takes_lyric),
            keep_with_next: listed(&classes.keep_with_next),
            category,
            lyric_offset: classes.lyric_offsets.get(token).copied().unwrap_or(0.0),
        })
    }

    fn glyph_text(&self, entry: &GlyphName) -> Option<String> {
        if entry.component_glyphs.is_empty() {
            return decode_codepoint(&entry.codepoint);
        }
        entry
            .component_glyphs
            .iter()
            .map(|name| {
                self.glyphnames
                    .get(name)
                    .and_then(|component| decode_codepoint(&component.codepoint))
            })
            .collect()
    }
}

/// Decode "U+E001" / "0xE001" into a one-character string; any other
/// non-empty value is taken literally.
fn decode_codepoint(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let hex = raw
        .strip_prefix("U+")
        .or_else(|| raw.strip_prefix("u+"))
        .or_else(|| raw.strip_prefix("0x"));
    match hex {
        Some(hex) => u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from),
        None if !raw.is_empty() => Some(raw.to_string()),
        None => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FontTable
// ═══════════════════════════════════════════════════════════════════════

/// Metric table for one font, in font units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFace {
    pub units_per_em: f64,
    pub ascent: f64,
    /// Negative, as in the font's hhea table
    pub descent: f64,
    /// Advance used for characters missing from `advances`
    pub default_advance: f64,
    #[serde(default)]
    pub advances: HashMap<char, f64>,
}

impl FontFace {
    pub fn new(units_per_em: f64, ascent: f64, descent: f64, default_advance: f64) -> Self {
        Self {
            units_per_em,
            ascent,
            descent,
            default_advance,
            advances: HashMap::new(),
        }
    }

    pub fn with_advance(mut self, c: char, advance: f64) -> Self {
        self.advances.insert(c, advance);
        self
    }

    fn scale(&self, size: f64) -> f64 {
        size / self.units_per_em
    }
}

/// In-memory [`FontProvider`]: registered faces plus neume font configurations.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    faces: HashMap<String, FontFace>,
    configs: HashMap<String, FontConfig>,
}

impl FontTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_face(&mut self, family: impl Into<String>, face: FontFace) {
        self.faces.insert(family.into(), face);
    }

    /// Register a neume font configuration under its `family_name`.
    pub fn register_config(&mut self, config: FontConfig) {
        self.configs.insert(config.family_name().to_string(), config);
    }

    pub fn is_registered(&self, family: &str) -> bool {
        self.faces.contains_key(family)
    }

    fn face(&self, family: &str) -> Result<&FontFace, LayoutError> {
        self.faces
            .get(family)
            .ok_or_else(|| LayoutError::UnknownFont(family.to_string()))
    }
}

impl FontProvider for FontTable {
    fn string_width(&self, text: &str, family: &str, size: f64) -> Result<f64, LayoutError> {
        let face = self.face(family)?;
        let units: f64 = text
            .chars()
            .map(|c| face.advances.get(&c).copied().unwrap_or(face.default_advance))
            .sum();
        Ok(units * face.scale(size))
    }

    fn ascent_descent(&self, family: &str, size: f64) -> Result<(f64, f64), LayoutError> {
        let face = self.face(family)?;
        Ok((face.ascent * face.scale(size), face.descent * face.scale(size)))
    }

    fn classify(&self, token: &str, neume_font: &str) -> Result<GlyphClass, LayoutError> {
        let config = self
            .configs
            .get(neume_font)
            .ok_or_else(|| LayoutError::UnknownFont(neume_font.to_string()))?;
        config.classify(token).ok_or_else(|| {
            warn!("glyph {token:?} not found in {neume_font:?}");
            LayoutError::UnknownGlyph {
                token: token.to_string(),
                family: neume_font.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPHNAMES: &str = r#"
oligon: {family: Main, codepoint: "U+E001"}
kentimata: {family: Main, codepoint: "U+E002"}
oligon_kentimata: {family: Main, codepoint: "", component_glyphs: [oligon, kentimata]}
martyria_pa: {family: Martyria, codepoint: "0xE100"}
"#;

    const CLASSES: &str = r#"
family_name: Test Neumes
takes_lyric: [oligon]
standalone: [oligon, martyria_pa]
keep_with_next: []
lyric_offsets: {oligon: 2.5}
martyriae: [martyria_pa]
"#;

    fn config() -> FontConfig {
        FontConfig::from_yaml(GLYPHNAMES, CLASSES).unwrap()
    }

    #[test]
    fn classify_reads_classes() {
        let oligon = config().classify("oligon").unwrap();
        assert_eq!(oligon.text, "\u{E001}");
        assert_eq!(oligon.family, "Test Neumes Main");
        assert!(oligon.standalone && oligon.takes_lyric && !oligon.keep_with_next);
        assert_eq!(oligon.lyric_offset, 2.5);
        assert_eq!(oligon.category, GlyphCategory::Ordinary);

        let pa = config().classify("martyria_pa").unwrap();
        assert_eq!(pa.category, GlyphCategory::Martyria);
        assert_eq!(pa.family, "Test Neumes Martyria");
        assert_eq!(pa.lyric_offset, 0.0);
    }

    #[test]
    fn composite_glyph_concatenates_components() {
        let g = config().classify("oligon_kentimata").unwrap();
        assert_eq!(g.text, "\u{E001}\u{E002}");
    }

    #[test]
    fn bad_yaml_is_a_config_error() {
        assert!(matches!(
            FontConfig::from_yaml("oligon: [", CLASSES),
            Err(LayoutError::Config(_))
        ));
    }

    #[test]
    fn table_metrics_scale_with_size() {
        let mut table = FontTable::new();
        table.register_face("Serif", FontFace::new(1000.0, 800.0, -200.0, 500.0).with_advance(' ', 250.0));
        assert_eq!(table.string_width("ab", "Serif", 10.0).unwrap(), 10.0);
        assert_eq!(table.string_width(" ", "Serif", 10.0).unwrap(), 2.5);
        assert_eq!(table.ascent_descent("Serif", 10.0).unwrap(), (8.0, -2.0));
    }

    #[test]
    fn table_fails_for_unknown_font_and_glyph() {
        let mut table = FontTable::new();
        table.register_config(config());
        assert_eq!(
            table.string_width("a", "Missing", 10.0),
            Err(LayoutError::UnknownFont("Missing".into()))
        );
        assert!(matches!(
            table.classify("nope", "Test Neumes"),
            Err(LayoutError::UnknownGlyph { .. })
        ));
        assert!(matches!(
            table.classify("oligon", "Other"),
            Err(LayoutError::UnknownFont(_))
        ));
    }
}
