//! Data model for a parsed piece of neume notation.
//!
//! These structures are created once by the parser (or the markup reader)
//! and are read-only afterwards: rendering never mutates them.

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Martyria glyph (in the martyria font) for each mode, indexed by mode - 1.
const MODE_GLYPHS: [&str; 8] = ["i", "o", "π", "[", "/I", "/O", "/P", "{"];

/// A complete document: header fragment plus an ordered list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Raw markup emitted verbatim before the `music` element
    header: String,
    /// Format version written on the root element
    version: String,
    /// Scores and paragraphs in input order
    blocks: Vec<Block>,
}

/// One top-level object of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Score(Score),
    Paragraph(Paragraph),
}

/// A single hymn: syllables plus mode metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    syllables: Vec<Syllable>,
    mode: Option<Mode>,
    mode_base: Option<String>,
    dropcap: bool,
}

/// A run of text with a named style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: String,
    pub style: String,
}

/// One lyric syllable and the neumes sung on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllable {
    /// Lyric text; may be empty for melismatic continuations
    pub text: String,
    /// Glyph tokens in the order they were written
    pub neumes: Vec<String>,
}

/// Semantic role of a glyph token, taken from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeumeRole {
    /// `m…`
    Martyria,
    /// `f…`
    Accidental,
    Plain,
}

/// One of the eight ecclesiastical modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mode(u8);

// ─── Document ────────────────────────────────────────────────────────

impl Document {
    pub const DEFAULT_VERSION: &'static str = "0.4";

    pub fn new(header: impl Into<String>) -> Self {
        Self::with_version(header, Self::DEFAULT_VERSION)
    }

    pub fn with_version(header: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            version: version.into(),
            blocks: Vec::new(),
        }
    }

    /// Append a block. Blocks are never reordered or removed.
    pub fn push(&mut self, block: impl Into<Block>) {
        self.blocks.push(block.into());
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn scores(&self) -> impl Iterator<Item = &Score> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Score(s) => Some(s),
            Block::Paragraph(_) => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Score(_) => None,
        })
    }
}

impl From<Score> for Block {
    fn from(score: Score) -> Self {
        Block::Score(score)
    }
}

impl From<Paragraph> for Block {
    fn from(paragraph: Paragraph) -> Self {
        Block::Paragraph(paragraph)
    }
}

// ─── Score ───────────────────────────────────────────────────────────

impl Score {
    /// Build a score, checking that it has syllables and a valid mode.
    pub fn new(
        syllables: Vec<Syllable>,
        mode: Option<u8>,
        mode_base: Option<String>,
        dropcap: bool,
    ) -> Result<Self, MetadataError> {
        let mode = mode.map(Mode::try_from).transpose()?;
        if syllables.is_empty() {
            return Err(MetadataError::NoSyllables);
        }
        Ok(Self {
            syllables,
            mode,
            mode_base,
            dropcap,
        })
    }

    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn mode_base(&self) -> Option<&str> {
        self.mode_base.as_deref()
    }

    pub fn dropcap(&self) -> bool {
        self.dropcap
    }

    /// First character of the first syllable's lyric, if the score shows a dropcap.
    pub fn dropcap_letter(&self) -> Option<char> {
        if !self.dropcap {
            return None;
        }
        self.syllables.first().and_then(|s| s.text.chars().next())
    }
}

// ─── Syllable ────────────────────────────────────────────────────────

impl Syllable {
    pub fn new(text: impl Into<String>, neumes: Vec<String>) -> Self {
        Self {
            text: text.into(),
            neumes,
        }
    }
}

impl NeumeRole {
    pub fn of_token(token: &str) -> Self {
        if token.starts_with('m') {
            NeumeRole::Martyria
        } else if token.starts_with('f') {
            NeumeRole::Accidental
        } else {
            NeumeRole::Plain
        }
    }

    /// Value of the `type` attribute on a `neume` element.
    pub fn markup_type(self) -> Option<&'static str> {
        match self {
            NeumeRole::Martyria => Some("martyria"),
            NeumeRole::Accidental => Some("accidental"),
            NeumeRole::Plain => None,
        }
    }
}

// ─── Mode ────────────────────────────────────────────────────────────

impl Mode {
    pub fn number(self) -> u8 {
        self.0
    }

    /// Martyria glyph representing this mode in a heading.
    pub fn glyph(self) -> &'static str {
        MODE_GLYPHS[usize::from(self.0 - 1)]
    }

    /// Inverse of [`Mode::glyph`].
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        MODE_GLYPHS
            .iter()
            .position(|g| *g == glyph)
            .map(|i| Mode(i as u8 + 1))
    }
}

impl TryFrom<u8> for Mode {
    type Error = MetadataError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=8).contains(&value) {
            Ok(Mode(value))
        } else {
            Err(MetadataError::InvalidMode(value.to_string()))
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        mode.0
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
