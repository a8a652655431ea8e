//! Notation text parser — converts the compact neume grammar into a Document.
//!
//! The input is a sequence of blocks separated by `---`. A block carrying a
//! `style` (or `s`) metadata key is a paragraph; every other block is a score:
//!
//! ```text
//! (mode:1)(base:Pa)
//! [Κύ:oligon-kentimata] [ri:ison] [e:apostrofos]
//! ---
//! (style:h1) Great Vespers
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{GrammarIssue, MetadataError, ParseError};
use crate::model::*;

/// Characters removed from score blocks before tokenizing.
const SCORE_WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// Longest excerpt of an offending block quoted in an error.
const EXCERPT_LEN: usize = 40;

/// Options controlling how notation text is split into blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Separator between blocks
    pub separator: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            separator: "---".to_string(),
        }
    }
}

/// Parse notation text into a Document with the default block separator.
pub fn parse_notation(raw: &str, header: &str) -> Result<Document, ParseError> {
    parse_notation_with(raw, header, &ParseOptions::default())
}

/// Parse notation text into a Document.
pub fn parse_notation_with(
    raw: &str,
    header: &str,
    options: &ParseOptions,
) -> Result<Document, ParseError> {
    let mut document = Document::new(header);

    for (index, block) in raw.split(options.separator.as_str()).enumerate() {
        let metadata = extract_metadata(block).map_err(|reason| grammar(index, block, reason))?;

        if metadata.get("style").or_else(|| metadata.get("s")).is_some() {
            debug!("block {index}: paragraph");
            document.push(parse_paragraph(index, block)?);
        } else {
            debug!("block {index}: score");
            document.push(parse_score(index, block)?);
        }
    }

    Ok(document)
}

// ─── Score blocks ────────────────────────────────────────────────────

/// Parse one score block. All whitespace is insignificant inside a score.
pub fn parse_score(index: usize, block: &str) -> Result<Score, ParseError> {
    let compact: String = block.chars().filter(|c| !SCORE_WHITESPACE.contains(c)).collect();
    let metadata = extract_metadata(&compact).map_err(|reason| grammar(index, block, reason))?;

    let mut syllables = Vec::new();
    for (group, segment) in compact.split('[').skip(1).enumerate() {
        let syllable = parse_syllable_group(group, segment)
            .map_err(|reason| grammar(index, block, reason))?;
        syllables.push(syllable);
    }
    if syllables.is_empty() {
        return Err(grammar(index, block, GrammarIssue::NoSyllableGroups));
    }

    let mode = metadata
        .get("mode")
        .map(parse_mode)
        .transpose()
        .map_err(|source| ParseError::InvalidMetadata { block: index, source })?;
    let mode_base = metadata.get("base").map(str::to_string);

    Score::new(syllables, mode, mode_base, true)
        .map_err(|source| ParseError::InvalidMetadata { block: index, source })
}

/// `segment` is the text following a `[`, up to the next `[` or end of block.
fn parse_syllable_group(group: usize, segment: &str) -> Result<Syllable, GrammarIssue> {
    let end = segment.find(']').ok_or(GrammarIssue::UnclosedGroup(group))?;
    let (lyric, neumes) = segment[..end]
        .split_once(':')
        .ok_or(GrammarIssue::MissingColon(group))?;

    let neumes: Vec<String> = neumes.split('-').map(str::to_string).collect();
    if neumes.iter().any(String::is_empty) {
        return Err(GrammarIssue::EmptyNeume(group));
    }

    Ok(Syllable::new(lyric, neumes))
}

fn parse_mode(value: &str) -> Result<u8, MetadataError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(MetadataError::InvalidMode(value.to_string()));
    }
    value
        .parse::<u8>()
        .map_err(|_| MetadataError::InvalidMode(value.to_string()))
}

// ─── Paragraph blocks ────────────────────────────────────────────────

/// Parse one paragraph block. Whitespace in the content is kept.
pub fn parse_paragraph(index: usize, block: &str) -> Result<Paragraph, ParseError> {
    let metadata = extract_metadata(block).map_err(|reason| grammar(index, block, reason))?;
    let style = metadata
        .get("style")
        .or_else(|| metadata.get("s"))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| grammar(index, block, GrammarIssue::MissingStyle))?;

    let content = match block.rfind(')') {
        Some(pos) => block[pos + 1..].trim(),
        None => block.trim(),
    };
    if content.is_empty() {
        return Err(grammar(index, block, GrammarIssue::EmptyParagraph));
    }

    Ok(Paragraph {
        content: content.to_string(),
        style: style.to_string(),
    })
}

// ─── Metadata ────────────────────────────────────────────────────────

/// `(key:value)` pairs of a block, in input order, first occurrence per key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metadata {
    pairs: Vec<(String, String)>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn insert(&mut self, key: &str, value: &str) {
        if self.get(key).is_some() {
            warn!("duplicate metadata key {key:?} ignored (value {value:?})");
            return;
        }
        self.pairs.push((key.to_string(), value.to_string()));
    }
}

/// Scan a block for `(key:value)` groups.
pub fn extract_metadata(block: &str) -> Result<Metadata, GrammarIssue> {
    let mut metadata = Metadata::default();
    for segment in block.split('(').skip(1) {
        let group = match segment.find(')') {
            Some(end) => &segment[..end],
            None => segment,
        };
        let (key, value) = group
            .split_once(':')
            .ok_or_else(|| GrammarIssue::MalformedMetadata(group.trim().to_string()))?;
        metadata.insert(key.trim(), value.trim());
    }
    Ok(metadata)
}

fn grammar(block: usize, text: &str, reason: GrammarIssue) -> ParseError {
    ParseError::Grammar {
        block,
        reason,
        excerpt: text.trim().chars().take(EXCERPT_LEN).collect(),
    }
}
