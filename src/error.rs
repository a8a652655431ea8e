//! Error types for parsing, serialization and layout.
//!
//! Every failure is raised while a document is being constructed or laid
//! out; nothing is retried and a partially built document is never returned.

use thiserror::Error;

/// A score's metadata violates the model's invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetadataError {
    /// `mode` must be an integer in 1..=8.
    #[error("invalid mode: {0:?} (expected 1-8)")]
    InvalidMode(String),

    /// A score must contain at least one syllable.
    #[error("no syllables provided")]
    NoSyllables,
}

/// What was wrong with a block of notation text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarIssue {
    #[error("no syllable groups found")]
    NoSyllableGroups,

    #[error("syllable group {0} is missing the ':' between lyric and neumes")]
    MissingColon(usize),

    #[error("syllable group {0} is not closed with ']'")]
    UnclosedGroup(usize),

    #[error("syllable group {0} contains an empty neume token")]
    EmptyNeume(usize),

    #[error("metadata group {0:?} is not a (key:value) pair")]
    MalformedMetadata(String),

    #[error("paragraph has neither a 'style' nor an 's' key")]
    MissingStyle,

    #[error("paragraph has no content")]
    EmptyParagraph,
}

/// Failure while turning notation text into a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The block's text doesn't follow the notation grammar.
    #[error("block {block}: {reason} (in {excerpt:?})")]
    Grammar {
        block: usize,
        reason: GrammarIssue,
        excerpt: String,
    },

    /// The block parsed, but its metadata is out of range.
    #[error("block {block}: {source}")]
    InvalidMetadata {
        block: usize,
        #[source]
        source: MetadataError,
    },
}

impl ParseError {
    /// Index of the offending block in the input.
    pub fn block(&self) -> usize {
        match self {
            ParseError::Grammar { block, .. } | ParseError::InvalidMetadata { block, .. } => *block,
        }
    }
}

/// Failure while reading BNML markup back into a document.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("unsupported root element: {0:?}")]
    UnsupportedRoot(String),

    #[error("missing required element <{0}>")]
    MissingElement(&'static str),

    #[error("unknown mode glyph {0:?} in mode heading")]
    UnknownModeGlyph(String),

    #[error(transparent)]
    InvalidMetadata(#[from] MetadataError),
}

/// Failure while resolving metrics or composing layout objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("font {0:?} is not registered")]
    UnknownFont(String),

    #[error("glyph {token:?} is not defined for font {family:?}")]
    UnknownGlyph { token: String, family: String },

    #[error("syllable built from an empty glyph chunk")]
    EmptyChunk,

    #[error("font configuration error: {0}")]
    Config(String),
}

/// Crate-level error for the convenience entry points in `lib.rs`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_reports_block_index() {
        let err = ParseError::Grammar {
            block: 2,
            reason: GrammarIssue::MissingColon(0),
            excerpt: "[la]".into(),
        };
        assert_eq!(err.block(), 2);
        assert!(err.to_string().starts_with("block 2:"));
    }

    #[test]
    fn metadata_error_is_source_of_parse_error() {
        use std::error::Error as _;
        let err = ParseError::InvalidMetadata {
            block: 0,
            source: MetadataError::InvalidMode("9".into()),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("invalid mode"));
    }
}
