//! Label layout engine
//!
//! Turns one label item plus a paper preset into concrete placements for
//! the title, amount line, date line and barcode. All coordinates are in
//! millimeters with a bottom-left origin (PDF space); the document
//! assembler draws them verbatim.

use shared::models::{LabelItem, PaperSize};

use crate::metrics::{Face, text_width_pt};
use crate::units::points_to_mm;

/// Fixed margin on all four sides of the label
pub const MARGIN_MM: f32 = 2.5;

const TITLE_MAX_PT: f32 = 16.0;
const TITLE_MIN_PT: f32 = 7.0;
const TITLE_STEP_PT: f32 = 0.5;
/// The title may use at most this share of the content width
const TITLE_FILL: f32 = 0.98;

const AMOUNT_PT: f32 = 9.0;
const DATE_PT: f32 = 8.0;
const CAPTION_PT: f32 = 7.0;

/// Gap between the two halves of a centered pair
const PAIR_GAP_MM: f32 = 4.0;

/// Barcode width cap, as a share of content width
const BARCODE_MAX_WIDTH: f32 = 0.88;
/// Barcode height cap, as a share of the space left after text
const BARCODE_MAX_HEIGHT: f32 = 0.92;

/// Rendered when a date is absent or unparsable
pub const DATE_PLACEHOLDER: &str = "__/__/____";

/// One positioned run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub text: String,
    pub size_pt: f32,
    pub x_mm: f32,
    pub baseline_mm: f32,
    pub face: Face,
}

/// Placement of the barcode raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarcodeBox {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Printable area after margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentRect {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Content rectangle for a paper preset
pub fn content_rect(paper: PaperSize) -> ContentRect {
    let (w, h) = paper.dimensions_mm();
    ContentRect {
        x_mm: MARGIN_MM,
        y_mm: MARGIN_MM,
        width_mm: w - 2.0 * MARGIN_MM,
        height_mm: h - 2.0 * MARGIN_MM,
    }
}

/// All placements for one label page
#[derive(Debug, Clone)]
pub struct LabelLayout {
    pub title: TextPlacement,
    /// Net weight and/or price; empty when both are absent
    pub amounts: Vec<TextPlacement>,
    /// Packaging and expiry dates; always present
    pub dates: Vec<TextPlacement>,
    /// Absent when the barcode failed to encode
    pub barcode: Option<BarcodeBox>,
    /// Human-readable payload under the bars, when requested
    pub caption: Option<TextPlacement>,
}

impl LabelLayout {
    /// Compute placements for one item on the given preset
    ///
    /// `barcode_dims` is the intrinsic pixel size of the rendered barcode;
    /// `None` leaves the barcode region blank (encode failure policy).
    pub fn compute(
        item: &LabelItem,
        paper: PaperSize,
        barcode_dims: Option<(u32, u32)>,
        human_readable: bool,
    ) -> Self {
        let rect = content_rect(paper);
        let cx = rect.x_mm + rect.width_mm / 2.0;
        let top = rect.y_mm + rect.height_mm;

        // Title: uppercase, trimmed, capped, then shrink-to-fit
        let title_text =
            truncate_chars(item.name.trim(), paper.title_char_cap()).to_uppercase();
        let title_size = fit_title_size(&title_text, rect.width_mm * TITLE_FILL);
        let title_width = width_mm(&title_text, title_size, Face::HelveticaBold);
        let mut cursor = top - line_height_mm(title_size);
        let title = TextPlacement {
            text: title_text,
            size_pt: title_size,
            x_mm: cx - title_width / 2.0,
            baseline_mm: cursor,
            face: Face::HelveticaBold,
        };

        // Net weight / price pair; the line is skipped entirely when both
        // are absent so no vertical space is consumed
        let weight = item
            .net_weight
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let price = format_price(item.price);
        let amounts = if weight.is_some() || price.is_some() {
            cursor -= line_height_mm(AMOUNT_PT);
            center_pair([weight, price], AMOUNT_PT, Face::Helvetica, cx, cursor)
        } else {
            Vec::new()
        };

        // Date pair, always rendered
        let packed = format!("PKD: {}", format_date(item.packed_on.as_deref()));
        let expires = format!("EXP: {}", format_date(item.expires_on.as_deref()));
        cursor -= line_height_mm(DATE_PT);
        let dates = center_pair(
            [Some(packed), Some(expires)],
            DATE_PT,
            Face::Helvetica,
            cx,
            cursor,
        );

        // Whatever vertical space is left belongs to the barcode
        let region_top = cursor - points_to_mm(DATE_PT) * 0.3;
        let caption_strip = if human_readable && barcode_dims.is_some() {
            line_height_mm(CAPTION_PT)
        } else {
            0.0
        };
        let avail = region_top - rect.y_mm - caption_strip;

        let barcode = barcode_dims.and_then(|(px_w, px_h)| {
            if avail <= 1.0 || px_w == 0 || px_h == 0 {
                return None;
            }
            let aspect = px_w as f32 / px_h as f32;
            // Width first, then clamp by height, preserving aspect ratio
            let mut width = rect.width_mm * BARCODE_MAX_WIDTH;
            let mut height = width / aspect;
            let max_height = avail * BARCODE_MAX_HEIGHT;
            if height > max_height {
                height = max_height;
                width = height * aspect;
            }
            Some(BarcodeBox {
                x_mm: cx - width / 2.0,
                y_mm: rect.y_mm + caption_strip + (avail - height) / 2.0,
                width_mm: width,
                height_mm: height,
            })
        });

        let caption = match (&barcode, human_readable) {
            (Some(b), true) => {
                let text = item.barcode.clone();
                let w = width_mm(&text, CAPTION_PT, Face::Helvetica);
                Some(TextPlacement {
                    text,
                    size_pt: CAPTION_PT,
                    x_mm: cx - w / 2.0,
                    baseline_mm: (b.y_mm - line_height_mm(CAPTION_PT) * 0.8).max(1.0),
                    face: Face::Helvetica,
                })
            }
            _ => None,
        };

        Self {
            title,
            amounts,
            dates,
            barcode,
            caption,
        }
    }
}

/// Largest size <= `TITLE_MAX_PT` whose rendered width fits `max_width_mm`
///
/// Descending linear search; the floor size is accepted even if the text
/// still overflows.
pub fn fit_title_size(text: &str, max_width_mm: f32) -> f32 {
    let mut size = TITLE_MAX_PT;
    while size > TITLE_MIN_PT {
        if width_mm(text, size, Face::HelveticaBold) <= max_width_mm {
            return size;
        }
        size -= TITLE_STEP_PT;
    }
    TITLE_MIN_PT
}

/// Price text ("RS 180"); absent or non-finite prices render nothing
pub fn format_price(price: Option<f64>) -> Option<String> {
    let p = price.filter(|p| p.is_finite())?;
    if p.fract().abs() < f64::EPSILON {
        Some(format!("RS {p:.0}"))
    } else {
        Some(format!("RS {p:.2}"))
    }
}

/// Date text as DD/MM/YYYY, falling back to the placeholder
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return DATE_PLACEHOLDER.to_string();
    };
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%Y/%m/%d"));
    match parsed {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => DATE_PLACEHOLDER.to_string(),
    }
}

/// Center up to two text runs on one baseline with a fixed gap
fn center_pair(
    texts: [Option<String>; 2],
    size_pt: f32,
    face: Face,
    cx: f32,
    baseline_mm: f32,
) -> Vec<TextPlacement> {
    let place = |text: String, x_mm: f32| TextPlacement {
        text,
        size_pt,
        x_mm,
        baseline_mm,
        face,
    };

    match texts {
        [Some(left), Some(right)] => {
            let lw = width_mm(&left, size_pt, face);
            let rw = width_mm(&right, size_pt, face);
            let start = cx - (lw + PAIR_GAP_MM + rw) / 2.0;
            vec![place(left, start), place(right, start + lw + PAIR_GAP_MM)]
        }
        [Some(only), None] | [None, Some(only)] => {
            let w = width_mm(&only, size_pt, face);
            vec![place(only, cx - w / 2.0)]
        }
        [None, None] => Vec::new(),
    }
}

fn width_mm(text: &str, size_pt: f32, face: Face) -> f32 {
    points_to_mm(text_width_pt(text, size_pt, face))
}

fn line_height_mm(size_pt: f32) -> f32 {
    points_to_mm(size_pt) * 1.2
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Dpi;

    fn create_test_item() -> LabelItem {
        LabelItem {
            id: "p-1".to_string(),
            name: "Sugar 1kg".to_string(),
            barcode: "1234567890".to_string(),
            net_weight: Some("1KG".to_string()),
            price: Some(180.0),
            packed_on: None,
            expires_on: None,
        }
    }

    #[test]
    fn test_content_rect_positive_for_all_presets() {
        for paper in [PaperSize::Inch3x2, PaperSize::Mm50x30, PaperSize::Mm40x30] {
            for _dpi in [Dpi::Dpi203, Dpi::Dpi300] {
                let rect = content_rect(paper);
                assert!(rect.width_mm > 0.0);
                assert!(rect.height_mm > 0.0);
                // Margins are symmetric
                let (w, h) = paper.dimensions_mm();
                assert!((w - rect.width_mm - 2.0 * MARGIN_MM).abs() < 1e-4);
                assert!((h - rect.height_mm - 2.0 * MARGIN_MM).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_shrink_to_fit_is_idempotent() {
        let text = "EXTRA LONG PRODUCT NAME WITH DETAIL";
        let first = fit_title_size(text, 40.0);
        let second = fit_title_size(text, 40.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_shrink_to_fit_descends_to_floor() {
        // Ridiculously narrow space still yields the floor size
        let size = fit_title_size("WWWWWWWWWWWWWWWWWWWW", 1.0);
        assert_eq!(size, TITLE_MIN_PT);
    }

    #[test]
    fn test_short_title_keeps_max_size() {
        let size = fit_title_size("OK", 70.0);
        assert_eq!(size, TITLE_MAX_PT);
    }

    #[test]
    fn test_title_uppercased_and_capped() {
        let mut item = create_test_item();
        item.name = "organic premium basmati rice extra long grain".to_string();
        let layout = LabelLayout::compute(&item, PaperSize::Inch3x2, None, false);

        assert_eq!(layout.title.text.chars().count(), 30);
        assert_eq!(layout.title.text, layout.title.text.to_uppercase());
    }

    #[test]
    fn test_scenario_sugar_label() {
        let item = create_test_item();
        let layout = LabelLayout::compute(&item, PaperSize::Inch3x2, Some((200, 80)), false);

        assert_eq!(layout.title.text, "SUGAR 1KG");
        let amount_texts: Vec<&str> =
            layout.amounts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(amount_texts, ["1KG", "RS 180"]);
        let date_texts: Vec<&str> = layout.dates.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(date_texts, ["PKD: __/__/____", "EXP: __/__/____"]);
        assert!(layout.barcode.is_some());
    }

    #[test]
    fn test_missing_amounts_skip_line() {
        let mut item = create_test_item();
        item.net_weight = None;
        item.price = None;
        let layout = LabelLayout::compute(&item, PaperSize::Inch3x2, Some((200, 80)), false);
        let with_amounts =
            LabelLayout::compute(&create_test_item(), PaperSize::Inch3x2, Some((200, 80)), false);

        assert!(layout.amounts.is_empty());
        // The date line moves up when the amount line is skipped
        assert!(layout.dates[0].baseline_mm > with_amounts.dates[0].baseline_mm);
    }

    #[test]
    fn test_single_amount_centered_alone() {
        let mut item = create_test_item();
        item.net_weight = None;
        let layout = LabelLayout::compute(&item, PaperSize::Inch3x2, None, false);

        assert_eq!(layout.amounts.len(), 1);
        let p = &layout.amounts[0];
        let rect = content_rect(PaperSize::Inch3x2);
        let cx = rect.x_mm + rect.width_mm / 2.0;
        let w = width_mm(&p.text, p.size_pt, p.face);
        assert!((p.x_mm + w / 2.0 - cx).abs() < 1e-3);
    }

    #[test]
    fn test_barcode_caps_and_aspect() {
        let item = create_test_item();
        for paper in [PaperSize::Inch3x2, PaperSize::Mm50x30, PaperSize::Mm40x30] {
            let layout = LabelLayout::compute(&item, paper, Some((400, 120)), false);
            let b = layout.barcode.expect("barcode box");
            let rect = content_rect(paper);

            assert!(b.width_mm <= rect.width_mm * BARCODE_MAX_WIDTH + 1e-4);
            // Aspect ratio preserved within rounding tolerance
            let aspect = 400.0 / 120.0;
            assert!((b.width_mm / b.height_mm - aspect).abs() < 1e-3);

            // Never taller than 92% of the remaining space
            let remaining = layout.dates[0].baseline_mm
                - points_to_mm(DATE_PT) * 0.3
                - rect.y_mm;
            assert!(b.height_mm <= remaining * BARCODE_MAX_HEIGHT + 1e-3);
            // And never below the bottom margin
            assert!(b.y_mm >= rect.y_mm - 1e-4);
        }
    }

    #[test]
    fn test_wide_barcode_is_height_clamped() {
        // A short, very wide barcode hits the width cap and keeps it
        let item = create_test_item();
        let layout = LabelLayout::compute(&item, PaperSize::Inch3x2, Some((800, 60)), false);
        let b = layout.barcode.unwrap();
        let rect = content_rect(PaperSize::Inch3x2);
        assert!((b.width_mm - rect.width_mm * BARCODE_MAX_WIDTH).abs() < 1e-3);

        // A nearly square one gets clamped by height instead, shrinking width
        let layout = LabelLayout::compute(&item, PaperSize::Mm40x30, Some((200, 190)), false);
        let b = layout.barcode.unwrap();
        assert!(b.width_mm < content_rect(PaperSize::Mm40x30).width_mm * BARCODE_MAX_WIDTH);
    }

    #[test]
    fn test_no_barcode_dims_leaves_region_blank() {
        let item = create_test_item();
        let layout = LabelLayout::compute(&item, PaperSize::Inch3x2, None, true);
        assert!(layout.barcode.is_none());
        assert!(layout.caption.is_none());
    }

    #[test]
    fn test_caption_present_when_requested() {
        let item = create_test_item();
        let layout = LabelLayout::compute(&item, PaperSize::Inch3x2, Some((200, 80)), true);
        let caption = layout.caption.expect("caption");
        assert_eq!(caption.text, "1234567890");
        let b = layout.barcode.unwrap();
        assert!(caption.baseline_mm < b.y_mm);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(180.0)).as_deref(), Some("RS 180"));
        assert_eq!(format_price(Some(99.5)).as_deref(), Some("RS 99.50"));
        assert_eq!(format_price(None), None);
        assert_eq!(format_price(Some(f64::NAN)), None);
        assert_eq!(format_price(Some(f64::INFINITY)), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2026-08-06")), "06/08/2026");
        assert_eq!(format_date(Some("2026-08-06T10:30:00+05:00")), "06/08/2026");
        assert_eq!(format_date(Some("not a date")), DATE_PLACEHOLDER);
        assert_eq!(format_date(Some("")), DATE_PLACEHOLDER);
        assert_eq!(format_date(None), DATE_PLACEHOLDER);
    }
}
