//! Default layout values (all in points, y grows downward).

// ── Page & margins ──────────────────────────────────────────────────
pub(super) const DEFAULT_PAGE_WIDTH: f64 = 595.0; // A4
pub(super) const PAGE_MARGIN_LEFT: f64 = 48.0;
pub(super) const PAGE_MARGIN_RIGHT: f64 = 48.0;
pub(super) const PAGE_MARGIN_TOP: f64 = 48.0;
pub(super) const PAGE_MARGIN_BOTTOM: f64 = 48.0;

// ── Fonts ───────────────────────────────────────────────────────────
pub(super) const NEUME_FONT: &str = "KA New Stathis";
pub(super) const NEUME_FONT_SIZE: f64 = 20.0;
pub(super) const LYRIC_FONT: &str = "Alegreya";
pub(super) const LYRIC_FONT_SIZE: f64 = 12.0;
pub(super) const LYRIC_TOP_MARGIN: f64 = 16.0; // chunk baseline → lyric baseline
pub(super) const DROPCAP_FONT_SIZE: f64 = 40.0;
pub(super) const HEADING_FONT_SIZE: f64 = 16.0;
pub(super) const MODE_FONT: &str = "KA New Stathis Martyria";
pub(super) const MODE_FONT_SIZE: f64 = 30.0;
pub(super) const PARAGRAPH_FONT_SIZE: f64 = 12.0;

// ── Spacing ─────────────────────────────────────────────────────────
pub(super) const SYLLABLE_SPACING: f64 = 4.0;
pub(super) const LINE_LEADING: f64 = 36.0; // minimum line height
pub(super) const LINE_SPACING: f64 = 6.0; // gap between consecutive lines
pub(super) const BLOCK_SPACING: f64 = 12.0; // gap after a score or paragraph
pub(super) const DROPCAP_GAP: f64 = 4.0;
pub(super) const EXTENDER_WIDTH: f64 = 0.6;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const NEUME_COLOR: &str = "#000000";
pub(super) const LYRIC_COLOR: &str = "#000000";
pub(super) const DROPCAP_COLOR: &str = "#cc0000";
pub(super) const HEADING_COLOR: &str = "#cc0000";
pub(super) const TEXT_COLOR: &str = "#000000";

// ── Glyphs ──────────────────────────────────────────────────────────
/// Syneches elafron: extenders under it end at its lyric offset, not its edge.
pub(super) const SYNECHES_ELAFRON: &str = "syne";
pub(super) const DASH: &str = "-";
