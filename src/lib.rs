//! neumelib — Byzantine neume notation parser, BNML serializer and layout engine.
//!
//! Plain-text notation is parsed into a [`Document`] of scores and paragraphs,
//! which can be written out as BNML markup, read back, or laid out and drawn
//! to SVG with font metrics from a [`FontProvider`](fonts::FontProvider).
//!
//! # Example
//! ```no_run
//! use neumelib::parse_text;
//!
//! let doc = parse_text("(mode:1)[Κύ-:oligon-ison][ri:apostrofos]", "").unwrap();
//! println!("Scores: {}", doc.scores().count());
//! println!("{}", doc.render());
//! ```

pub mod bnml;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod markup;
pub mod model;
pub mod parser;

use std::path::Path;

pub use bnml::parse_markup;
pub use error::{Error, GrammarIssue, LayoutError, MarkupError, MetadataError, ParseError};
pub use markup::{Language, RenderOptions};
pub use model::*;
pub use parser::{parse_notation, parse_notation_with, ParseOptions};

use fonts::FontProvider;
use layout::{render_document_to_svg, LayoutConfig};

/// Parse notation text into a Document.
pub fn parse_text(raw: &str, header: &str) -> Result<Document, Error> {
    Ok(parse_notation(raw, header)?)
}

/// Parse a notation file from a file path.
pub fn parse_file<P: AsRef<Path>>(path: P, header: &str) -> Result<Document, Error> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_text(&raw, header)
}

/// Parse notation text and serialize it to BNML.
pub fn render_text_to_markup(raw: &str, header: &str) -> Result<String, Error> {
    Ok(parse_text(raw, header)?.render())
}

/// Convert a parsed document to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn document_to_json(document: &Document) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse notation text and lay it out as a single SVG page.
pub fn render_text_to_svg<P: FontProvider + ?Sized>(
    raw: &str,
    header: &str,
    provider: &P,
    config: &LayoutConfig,
) -> Result<String, Error> {
    let document = parse_text(raw, header)?;
    Ok(render_document_to_svg(provider, &document, config)?)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for embedding in native editors
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Parse notation text and return BNML as a C string.
/// The caller must free the returned string with `neumelib_free_string`.
///
/// `header` may be null for an empty header. Returns null on a parse error.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string. `header` must be
/// null or a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn neumelib_render_text(
    text: *const c_char,
    header: *const c_char,
) -> *mut c_char {
    let Some(raw) = (unsafe { c_str(text) }) else {
        return std::ptr::null_mut();
    };
    let header = unsafe { c_str(header) }.unwrap_or_default();

    match render_text_to_markup(raw, header) {
        Ok(markup) => CString::new(markup).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("neumelib_render_text: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Parse notation text and return the Document as JSON.
/// The caller must free the returned string with `neumelib_free_string`.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn neumelib_parse_to_json(text: *const c_char) -> *mut c_char {
    let Some(raw) = (unsafe { c_str(text) }) else {
        return std::ptr::null_mut();
    };

    match parse_text(raw, "").and_then(|doc| document_to_json(&doc)) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("neumelib_parse_to_json: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by neumelib functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a neumelib function, or null.
#[no_mangle]
pub unsafe extern "C" fn neumelib_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_carries_block_types() {
        let doc = parse_text("(style:h1) Title\n---\n[a:n1]", "").unwrap();
        let json = document_to_json(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["blocks"][0]["type"], "paragraph");
        assert_eq!(value["blocks"][1]["type"], "score");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_file("/nonexistent/neumes.txt", "").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn ffi_round_trip() {
        let text = CString::new("[a:n1]").unwrap();
        let out = unsafe { neumelib_render_text(text.as_ptr(), std::ptr::null()) };
        assert!(!out.is_null());
        let markup = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        unsafe { neumelib_free_string(out) };
        assert!(markup.contains("<neume>n1</neume>"));

        let bad = CString::new("(mode:9)[a:n1]").unwrap();
        assert!(unsafe { neumelib_render_text(bad.as_ptr(), std::ptr::null()) }.is_null());
    }
}
