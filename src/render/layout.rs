//! Card geometry and the SVG document for everything except the
//! auxiliary images.

use strum::IntoEnumIterator;

use crate::error::RenderError;
use crate::model::{PlayerStats, StatBlock, View};

pub const CARD_WIDTH: u32 = 1600;
pub const CARD_HEIGHT: u32 = 820;

pub const TABLE_WIDTH: f32 = 350.0;
pub const TABLE_HEIGHT: f32 = 180.0;
pub const TABLE_MARGIN: f32 = 30.0;
pub const TABLES_START_Y: f32 = 300.0;
const SECTION_MARGIN: f32 = 40.0;
const HEADING_TABLE_GAP: f32 = 55.0;
const LEFT: f32 = 50.0;
const ITEM_ROW_HEIGHT: f32 = 25.0;

pub const FONT_FAMILY: &str = "Montserrat";
// Montserrat ascender, in em; text is positioned by its top edge.
const ASCENT: f32 = 0.968;

type Rgb = (u8, u8, u8);

const BACKGROUND: Rgb = (30, 30, 30);
const WHITE: Rgb = (255, 255, 255);
const DIVIDER: Rgb = (100, 100, 100);
const TABLE_FILL: Rgb = (45, 45, 45);
const TABLE_OUTLINE: Rgb = (80, 80, 80);
const ITEM_TITLE: Rgb = (200, 200, 200);

#[derive(Debug, Clone, Copy)]
struct Font {
    size: f32,
    weight: u16,
}

const BOLD: u16 = 700;
const MEDIUM: u16 = 500;

const NAME_FONT: Font = Font { size: 40.0, weight: BOLD };
const ELO_FONT: Font = Font { size: 36.0, weight: MEDIUM };
const TABLE_TITLE_FONT: Font = Font { size: 28.0, weight: BOLD };
const MAIN_VALUE_FONT: Font = Font { size: 24.0, weight: BOLD };
const ITEM_FONT: Font = Font { size: 22.0, weight: MEDIUM };
const SECTION_FONT: Font = Font { size: 32.0, weight: BOLD };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Color of a table's main value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Warning,
    Positive,
}

impl Tint {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tint::Warning => (230, 118, 118),
            Tint::Positive => (214, 243, 148),
        }
    }
}

/// Pick the main value color of `block`.
///
/// "Avg. KDR" and "FA Rating" below 1.0 and "Winrate" below 50.0 are
/// warnings; the thresholds themselves are not. Other titles are never
/// parsed.
pub fn main_value_tint(block: &StatBlock) -> Result<Tint, RenderError> {
    let (Some(title), Some(value)) = (block.title.as_deref(), block.main_value.as_deref()) else {
        return Ok(Tint::Positive);
    };

    let threshold = match title {
        "Avg. KDR" | "FA Rating" => 1.0,
        "Winrate" => 50.0,
        _ => return Ok(Tint::Positive),
    };

    let number: f64 = value
        .trim()
        .parse()
        .map_err(|e| RenderError::InvalidMainValue {
            title: title.to_string(),
            value: value.to_string(),
            source: e,
        })?;

    Ok(if number < threshold {
        Tint::Warning
    } else {
        Tint::Positive
    })
}

/// Build the SVG document for the card background, texts and stat tables.
pub(crate) fn card_svg(stats: &PlayerStats) -> Result<String, RenderError> {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}">
<rect x="0" y="0" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" fill="{}"/>
"#,
        rgb(BACKGROUND)
    );

    push_text(&mut svg, "name", 295.0, 55.0, NAME_FONT, WHITE, Anchor::Start, &stats.name);
    push_text(&mut svg, "elo", 295.0, 120.0, ELO_FONT, WHITE, Anchor::Start, &stats.elo);
    push_line(&mut svg, 40.0, 230.0, CARD_WIDTH as f32 - 40.0, 230.0, DIVIDER, 1.0);

    let mut heading_top = TABLES_START_Y - SECTION_MARGIN;
    for view in View::iter() {
        push_text(
            &mut svg,
            "section",
            LEFT,
            heading_top,
            SECTION_FONT,
            WHITE,
            Anchor::Start,
            view.heading(),
        );

        let table_top = heading_top + HEADING_TABLE_GAP;
        for (i, block) in stats.view(view).iter().enumerate() {
            let x = LEFT + i as f32 * (TABLE_WIDTH + TABLE_MARGIN);
            svg.push_str(&stat_table_svg(x, table_top, block)?);
        }
        heading_top = table_top + TABLE_HEIGHT + SECTION_MARGIN;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// SVG fragment for one stat table with its top-left corner at (`x`, `y`).
pub(crate) fn stat_table_svg(x: f32, y: f32, block: &StatBlock) -> Result<String, RenderError> {
    let tint = main_value_tint(block)?;
    let mut out = String::from("<g class=\"stat-table\">\n");

    // The outline is drawn inside the table bounds.
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="2"/>
"#,
        x + 1.0,
        y + 1.0,
        TABLE_WIDTH - 2.0,
        TABLE_HEIGHT - 2.0,
        rgb(TABLE_FILL),
        rgb(TABLE_OUTLINE),
    ));

    let center = x + TABLE_WIDTH / 2.0;
    if let Some(title) = &block.title {
        push_text(&mut out, "table-title", center, y + 15.0, TABLE_TITLE_FONT, WHITE, Anchor::Middle, title);
    }
    if let Some(value) = &block.main_value {
        push_text(&mut out, "main-value", center, y + 50.0, MAIN_VALUE_FONT, tint.rgb(), Anchor::Middle, value);
    }

    push_line(&mut out, x + 20.0, y + 85.0, x + TABLE_WIDTH - 20.0, y + 85.0, DIVIDER, 1.0);

    for (i, item) in block.items.iter().enumerate() {
        let top = y + 95.0 + i as f32 * ITEM_ROW_HEIGHT;
        push_text(&mut out, "item-title", x + 20.0, top, ITEM_FONT, ITEM_TITLE, Anchor::Start, &item.title);
        push_text(&mut out, "item-value", x + TABLE_WIDTH - 20.0, top, ITEM_FONT, WHITE, Anchor::End, &item.value);
    }

    out.push_str("</g>\n");
    Ok(out)
}

#[allow(clippy::too_many_arguments)]
fn push_text(out: &mut String, class: &str, x: f32, top: f32, font: Font, fill: Rgb, anchor: Anchor, content: &str) {
    out.push_str(&format!(
        r#"<text class="{class}" x="{x}" y="{}" font-family="{FONT_FAMILY}, sans-serif" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}" xml:space="preserve">{}</text>
"#,
        top + font.size * ASCENT,
        font.size,
        font.weight,
        rgb(fill),
        anchor.as_str(),
        escape_xml(content),
    ));
}

fn push_line(out: &mut String, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgb, width: f32) {
    out.push_str(&format!(
        r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{width}"/>
"#,
        rgb(stroke)
    ));
}

fn rgb((r, g, b): Rgb) -> String {
    format!("rgb({r},{g},{b})")
}

/// Escape markup and drop characters XML 1.0 does not allow.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
