//! Built-in font metrics
//!
//! Advance widths for the two Helvetica faces drawn on labels, taken from
//! the Adobe core-14 AFM files (thousandths of an em, ASCII 32..=126).
//! Labels only carry Latin text, so the tables cover printable ASCII;
//! anything outside falls back to a nominal glyph width.

/// Face used for a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Helvetica,
    HelveticaBold,
}

/// Fallback advance for characters outside the table
const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn char_width(c: char, face: Face) -> u16 {
    let table = match face {
        Face::Helvetica => &HELVETICA_WIDTHS,
        Face::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
    };
    let code = c as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Rendered width of `text` at `size_pt`, in points
pub fn text_width_pt(text: &str, size_pt: f32, face: Face) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, face) as u32).sum();
    units as f32 * size_pt / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_zero_width() {
        assert_eq!(text_width_pt("", 12.0, Face::Helvetica), 0.0);
    }

    #[test]
    fn test_width_scales_with_size() {
        let at_10 = text_width_pt("SUGAR", 10.0, Face::HelveticaBold);
        let at_20 = text_width_pt("SUGAR", 20.0, Face::HelveticaBold);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-4);
    }

    #[test]
    fn test_bold_wider_than_regular() {
        let regular = text_width_pt("BASMATI RICE", 12.0, Face::Helvetica);
        let bold = text_width_pt("BASMATI RICE", 12.0, Face::HelveticaBold);
        assert!(bold > regular);
    }

    #[test]
    fn test_digit_width_is_uniform() {
        // All Helvetica digits share the 556 advance, so numeric fields line up
        let narrow = text_width_pt("1111", 10.0, Face::Helvetica);
        let wide = text_width_pt("8888", 10.0, Face::Helvetica);
        assert_eq!(narrow, wide);
    }

    #[test]
    fn test_non_ascii_falls_back() {
        let width = text_width_pt("é", 10.0, Face::Helvetica);
        assert_eq!(width, DEFAULT_WIDTH as f32 * 10.0 / 1000.0);
    }
}
