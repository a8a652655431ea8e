//! BNML reader — parses markup written by the serializer back into a Document.
//!
//! Root children other than `<music>` form the header. A `<para>` holding a
//! `<font>` element is a mode heading and is folded into the score after it.

use roxmltree::Node;

use crate::error::MarkupError;
use crate::model::*;

/// Parse a BNML string into a Document.
pub fn parse_markup(xml: &str) -> Result<Document, MarkupError> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    if root.tag_name().name() != "bnml" {
        return Err(MarkupError::UnsupportedRoot(root.tag_name().name().to_string()));
    }

    let version = root
        .attribute("bnml_version")
        .unwrap_or(Document::DEFAULT_VERSION);

    let mut header = Vec::new();
    let mut music = None;
    for child in root.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "music" {
            music = Some(child);
        } else {
            header.push(&xml[child.range()]);
        }
    }
    let music = music.ok_or(MarkupError::MissingElement("music"))?;

    let mut document = Document::with_version(header.join("\n"), version);
    let mut heading: Option<(Mode, Option<String>)> = None;

    for child in music.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "para" => match parse_mode_heading(&child)? {
                Some(h) => heading = Some(h),
                None => document.push(Paragraph {
                    content: text_content(&child).trim().to_string(),
                    style: child.attribute("style").unwrap_or_default().to_string(),
                }),
            },
            "score" => document.push(parse_score(&child, heading.take())?),
            _ => {}
        }
    }

    Ok(document)
}

// ─── Scores ──────────────────────────────────────────────────────────

fn parse_score(node: &Node, heading: Option<(Mode, Option<String>)>) -> Result<Score, MarkupError> {
    let mut dropcap = false;
    let mut syllables = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "dropcap" => dropcap = true,
            "syllable" => syllables.push(parse_syllable(&child)),
            _ => {}
        }
    }

    let (mode, base) = match heading {
        Some((mode, base)) => (Some(mode.number()), base),
        None => (None, None),
    };
    Ok(Score::new(syllables, mode, base, dropcap)?)
}

fn parse_syllable(node: &Node) -> Syllable {
    let mut text = String::new();
    let mut neumes = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "lyric" => text = text_content(&child),
            "neume-group" => {
                neumes.extend(
                    child
                        .children()
                        .filter(|n| n.has_tag_name("neume"))
                        .map(|n| text_content(&n)),
                );
            }
            _ => {}
        }
    }

    Syllable::new(text, neumes)
}

// ─── Mode headings ───────────────────────────────────────────────────

/// `Some((mode, base))` if this paragraph is a mode heading.
fn parse_mode_heading(node: &Node) -> Result<Option<(Mode, Option<String>)>, MarkupError> {
    let Some(font) = node.children().find(|n| n.has_tag_name("font")) else {
        return Ok(None);
    };

    let glyph = text_content(&font);
    let mode = Mode::from_glyph(glyph.trim())
        .ok_or_else(|| MarkupError::UnknownModeGlyph(glyph.clone()))?;

    let base: String = font
        .next_siblings()
        .skip(1)
        .filter_map(|n| n.text())
        .collect();
    let base = base.trim();

    Ok(Some((mode, (!base.is_empty()).then(|| base.to_string()))))
}

fn text_content(node: &Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use crate::parser::parse_notation;

    #[test]
    fn reads_back_rendered_document() {
        let raw = "(style:h1) Vespers\n---\n(mode:3)(base:Ga)[Κύ-:oligon-m1][ri:f2]";
        let doc = parse_notation(raw, "<defaults/>").unwrap();
        let read = parse_markup(&doc.render()).unwrap();
        assert_eq!(read, doc);
    }

    #[test]
    fn heading_without_base() {
        let doc = parse_notation("(mode:7)[a:n1]", "").unwrap();
        let read = parse_markup(&doc.render()).unwrap();
        let score = read.scores().next().unwrap();
        assert_eq!(score.mode().map(Mode::number), Some(7));
        assert_eq!(score.mode_base(), None);
    }

    #[test]
    fn escaped_text_is_unescaped() {
        let doc = parse_notation("(s:body) Vespers & Matins <1>", "").unwrap();
        let read = parse_markup(&doc.render()).unwrap();
        assert_eq!(read.paragraphs().next().unwrap().content, "Vespers & Matins <1>");
    }

    #[test]
    fn rejects_other_roots() {
        assert!(matches!(
            parse_markup("<score-partwise/>"),
            Err(MarkupError::UnsupportedRoot(_))
        ));
    }

    #[test]
    fn requires_music_element() {
        assert!(matches!(
            parse_markup(r#"<bnml bnml_version="0.4"/>"#),
            Err(MarkupError::MissingElement("music"))
        ));
    }

    #[test]
    fn empty_score_is_invalid() {
        let xml = r#"<bnml bnml_version="0.4"><music><score/></music></bnml>"#;
        assert!(matches!(
            parse_markup(xml),
            Err(MarkupError::InvalidMetadata(MetadataError::NoSyllables))
        ));
    }

    #[test]
    fn unknown_mode_glyph() {
        let xml = r#"<bnml><music><para style="h2">Mode <font>?</font></para><score><syllable><lyric>a</lyric><neume-group><neume>n</neume></neume-group></syllable></score></music></bnml>"#;
        assert!(matches!(parse_markup(xml), Err(MarkupError::UnknownModeGlyph(_))));
    }
}
