//! BNML markup serializer — deterministic Document → text transform.
//!
//! Text content and attribute values are escaped at the leaves; nested
//! markup produced by [`tag`] is passed through untouched.

use serde::{Deserialize, Serialize};

use crate::model::*;

/// Language of the "Mode" word in mode headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    /// Church Slavonic
    #[default]
    CS,
    /// Greek
    EL,
    /// English
    EN,
}

impl Language {
    pub fn mode_term(self) -> &'static str {
        match self {
            Language::CS => "Гла́съ",
            Language::EL => " Ἦχος",
            Language::EN => "Mode",
        }
    }
}

/// Options for rendering a document to markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Language of mode headings
    pub language: Language,
    /// Font used for the mode martyria in headings
    pub mode_font_family: String,
    pub mode_font_size: u32,
    /// Emit a mode heading before every score that has a mode
    pub render_title_martyria: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: Language::CS,
            mode_font_family: "KA New Stathis Martyria".to_string(),
            mode_font_size: 30,
            render_title_martyria: true,
        }
    }
}

// ─── Tag primitive ───────────────────────────────────────────────────

/// Wrap `content` in a `name` element.
///
/// Content that already contains markup is indented one tab and placed on
/// its own lines. Empty content yields a self-closing element.
pub fn tag(content: &str, name: &str, attrs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(content.len() + name.len() * 2 + 8);
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }

    if content.is_empty() {
        out.push_str("/>");
        return out;
    }
    out.push('>');

    if content.contains('<') {
        for line in content.split('\n') {
            out.push_str("\n\t");
            out.push_str(line);
        }
        out.push('\n');
    } else {
        out.push_str(content);
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
    out
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ─── Node rendering ──────────────────────────────────────────────────

impl Syllable {
    pub fn render(&self) -> String {
        let lyric = tag(&escape(&self.text), "lyric", &[]);

        let neumes: Vec<String> = self
            .neumes
            .iter()
            .map(|token| {
                let content = escape(token);
                match NeumeRole::of_token(token).markup_type() {
                    Some(kind) => tag(&content, "neume", &[("type", kind)]),
                    None => tag(&content, "neume", &[]),
                }
            })
            .collect();
        let group = tag(&neumes.join("\n"), "neume-group", &[]);

        tag(&format!("{lyric}\n{group}"), "syllable", &[])
    }
}

impl Score {
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.syllables().len() + 1);
        if let Some(letter) = self.dropcap_letter() {
            parts.push(tag(&escape(&letter.to_string()), "dropcap", &[]));
        }
        parts.extend(self.syllables().iter().map(Syllable::render));
        tag(&parts.join("\n"), "score", &[])
    }

    /// Heading paragraph announcing the mode, or `None` when no mode is set.
    pub fn render_mode(&self, options: &RenderOptions) -> Option<String> {
        let mode = self.mode()?;
        let size = options.mode_font_size.to_string();

        let mut content = vec![
            escape(options.language.mode_term()),
            tag(
                &escape(mode.glyph()),
                "font",
                &[
                    ("font_family", options.mode_font_family.as_str()),
                    ("font_size", size.as_str()),
                ],
            ),
        ];
        if let Some(base) = self.mode_base() {
            content.push(escape(base));
        }

        Some(tag(&content.join("\n"), "para", &[("style", "h2")]))
    }
}

impl Paragraph {
    pub fn render(&self) -> String {
        tag(&escape(&self.content), "para", &[("style", self.style.as_str())])
    }
}

impl Block {
    pub fn render(&self) -> String {
        match self {
            Block::Score(score) => score.render(),
            Block::Paragraph(para) => para.render(),
        }
    }
}

impl Document {
    /// Render with the default options.
    pub fn render(&self) -> String {
        self.render_with(&RenderOptions::default())
    }

    pub fn render_with(&self, options: &RenderOptions) -> String {
        let footer = tag(&tag("", "page-number", &[("align", "center")]), "footer", &[]);
        let mut music = vec![footer];

        for block in self.blocks() {
            if let Block::Score(score) = block {
                if options.render_title_martyria {
                    music.extend(score.render_mode(options));
                }
            }
            music.push(block.render());
        }

        let content = format!("{}\n{}", self.header(), tag(&music.join("\n"), "music", &[]));
        tag(&content, "bnml", &[("bnml_version", self.version())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn score(text: &str, neumes: &[&str], mode: Option<u8>) -> Score {
        let syllable = Syllable::new(text, neumes.iter().map(|n| n.to_string()).collect());
        Score::new(vec![syllable], mode, None, true).unwrap()
    }

    #[test]
    fn tag_plain_content() {
        assert_eq!(tag("la", "lyric", &[]), "<lyric>la</lyric>");
    }

    #[test]
    fn tag_empty_content_self_closes() {
        assert_eq!(
            tag("", "page-number", &[("align", "center")]),
            r#"<page-number align="center"/>"#
        );
    }

    #[test]
    fn tag_nested_content_is_indented() {
        assert_eq!(
            tag("<a/>\n<b/>", "group", &[]),
            "<group>\n\t<a/>\n\t<b/>\n</group>"
        );
    }

    #[test]
    fn tag_attributes_keep_insertion_order() {
        assert_eq!(
            tag("x", "font", &[("z", "1"), ("a", "2")]),
            r#"<font z="1" a="2">x</font>"#
        );
    }

    #[test]
    fn escape_reserved_characters() {
        assert_eq!(escape(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn syllable_render_marks_roles() {
        let syllable = Syllable::new("la", vec!["m1".into(), "f2".into(), "n3".into()]);
        let expected = "<syllable>\n\
            \t<lyric>la</lyric>\n\
            \t<neume-group>\n\
            \t\t<neume type=\"martyria\">m1</neume>\n\
            \t\t<neume type=\"accidental\">f2</neume>\n\
            \t\t<neume>n3</neume>\n\
            \t</neume-group>\n\
            </syllable>";
        assert_eq!(syllable.render(), expected);
    }

    #[test]
    fn empty_lyric_self_closes() {
        let syllable = Syllable::new("", vec!["n1".into()]);
        assert!(syllable.render().contains("<lyric/>"));
    }

    #[test]
    fn score_render_prefixes_dropcap() {
        let rendered = score("Κύ", &["n1"], None).render();
        assert!(rendered.starts_with("<score>\n\t<dropcap>Κ</dropcap>\n\t<syllable>"));
        assert!(rendered.ends_with("</score>"));
    }

    #[test]
    fn mode_heading_per_language() {
        let s = score("a", &["n1"], Some(3));
        let cs = s.render_mode(&RenderOptions::default()).unwrap();
        assert!(cs.contains("Гла́съ"));
        assert!(cs.contains(">π</font>"));
        assert!(cs.starts_with(r#"<para style="h2">"#));

        let en = s
            .render_mode(&RenderOptions {
                language: Language::EN,
                ..RenderOptions::default()
            })
            .unwrap();
        assert!(en.contains("Mode"));
    }

    #[test]
    fn no_mode_no_heading() {
        assert_eq!(score("a", &["n1"], None).render_mode(&RenderOptions::default()), None);
    }

    #[test]
    fn mode_heading_includes_base() {
        let syllable = Syllable::new("a", vec!["n1".into()]);
        let s = Score::new(vec![syllable], Some(1), Some("Pa".into()), true).unwrap();
        let heading = s.render_mode(&RenderOptions::default()).unwrap();
        assert!(heading.contains("\n\tPa\n</para>"));
    }

    #[test]
    fn paragraph_render() {
        let para = Paragraph {
            content: "Vespers & Matins".into(),
            style: "h1".into(),
        };
        assert_eq!(para.render(), r#"<para style="h1">Vespers &amp; Matins</para>"#);
    }

    #[test]
    fn document_render_structure() {
        let mut doc = Document::new("<defaults/>");
        doc.push(score("a", &["n1"], Some(1)));
        let out = doc.render();
        assert!(out.starts_with("<bnml bnml_version=\"0.4\">\n\t<defaults/>\n\t<music>"));
        assert!(out.contains("<footer>\n\t\t\t<page-number align=\"center\"/>\n\t\t</footer>"));
        let heading = out.find("<para style=\"h2\">").unwrap();
        let score_pos = out.find("<score>").unwrap();
        assert!(heading < score_pos);
        assert!(out.ends_with("</music>\n</bnml>"));
    }

    #[test]
    fn document_render_can_skip_headings() {
        let mut doc = Document::new("");
        doc.push(score("a", &["n1"], Some(1)));
        let options = RenderOptions {
            render_title_martyria: false,
            ..RenderOptions::default()
        };
        assert!(!doc.render_with(&options).contains("h2"));
    }
}
