//! ZPL command-stream generation
//!
//! The fixed-geometry alternative to the PDF path, for printers that speak
//! ZPL natively. Dimensions come from a per-(paper, dpi) preset table and
//! text is truncated to a character budget instead of shrink-to-fit: less
//! layout precision, broader printer compatibility.

use shared::models::{Dpi, LabelItem, PaperSize, PrintOptions};

use crate::error::PrintResult;
use crate::layout::{format_date, format_price};
use crate::render::Artifact;

/// Fixed geometry for one (paper, dpi) combination, in device dots
#[derive(Debug, Clone, Copy)]
pub struct ZplPreset {
    pub width_dots: u32,
    pub height_dots: u32,
    pub margin_dots: u32,
    /// Title font cell (height, width)
    pub font: (u32, u32),
    /// Detail line font cell (height, width)
    pub small_font: (u32, u32),
    /// Character budget for every text line
    pub text_chars: usize,
    /// Narrow module width for ^BY
    pub module_width: u32,
    pub barcode_height: u32,
}

/// Geometry lookup; no dynamic fitting on this path
pub fn preset_for(paper: PaperSize, dpi: Dpi) -> ZplPreset {
    match (paper, dpi) {
        (PaperSize::Inch3x2, Dpi::Dpi203) => ZplPreset {
            width_dots: 609,
            height_dots: 406,
            margin_dots: 16,
            font: (46, 30),
            small_font: (26, 16),
            text_chars: 16,
            module_width: 3,
            barcode_height: 180,
        },
        (PaperSize::Inch3x2, Dpi::Dpi300) => ZplPreset {
            width_dots: 900,
            height_dots: 600,
            margin_dots: 24,
            font: (68, 44),
            small_font: (38, 24),
            text_chars: 16,
            module_width: 4,
            barcode_height: 270,
        },
        (PaperSize::Mm50x30, Dpi::Dpi203) => ZplPreset {
            width_dots: 400,
            height_dots: 240,
            margin_dots: 12,
            font: (36, 22),
            small_font: (22, 14),
            text_chars: 12,
            module_width: 2,
            barcode_height: 110,
        },
        (PaperSize::Mm50x30, Dpi::Dpi300) => ZplPreset {
            width_dots: 590,
            height_dots: 354,
            margin_dots: 18,
            font: (54, 34),
            small_font: (32, 20),
            text_chars: 12,
            module_width: 3,
            barcode_height: 160,
        },
        (PaperSize::Mm40x30, Dpi::Dpi203) => ZplPreset {
            width_dots: 320,
            height_dots: 240,
            margin_dots: 12,
            font: (32, 20),
            small_font: (20, 12),
            text_chars: 10,
            module_width: 2,
            barcode_height: 110,
        },
        (PaperSize::Mm40x30, Dpi::Dpi300) => ZplPreset {
            width_dots: 472,
            height_dots: 354,
            margin_dots: 18,
            font: (46, 30),
            small_font: (30, 18),
            text_chars: 10,
            module_width: 3,
            barcode_height: 160,
        },
    }
}

/// ZPL rendering path
#[derive(Debug, Clone, Copy, Default)]
pub struct ZplRenderer;

impl ZplRenderer {
    /// Render the item set to a concatenated ZPL stream
    ///
    /// Copies are realized by literal repetition of the label block, in
    /// input item order.
    pub fn render(&self, items: &[LabelItem], options: &PrintOptions) -> PrintResult<Artifact> {
        let preset = preset_for(options.paper_size, options.dpi);
        let copies = options.copies.max(1);

        let mut blocks = Vec::with_capacity(items.len() * copies as usize);
        for item in items {
            let block = self.label_block(item, &preset, options.human_readable);
            for _ in 0..copies {
                blocks.push(block.clone());
            }
        }

        Ok(Artifact::Zpl(blocks.join("\n")))
    }

    /// One ^XA..^XZ block: left ~45% text column, right ~55% barcode column
    fn label_block(&self, item: &LabelItem, p: &ZplPreset, human_readable: bool) -> String {
        let x = p.margin_dots;
        let mut y = p.margin_dots;
        let mut z = String::new();

        z.push_str("^XA\n");
        z.push_str(&format!("^PW{}\n^LL{}\n", p.width_dots, p.height_dots));

        let title = sanitize(&truncate_chars(item.name.trim(), p.text_chars).to_uppercase());
        z.push_str(&format!(
            "^FO{x},{y}^A0N,{},{}^FD{title}^FS\n",
            p.font.0, p.font.1
        ));
        y += p.font.0 + p.small_font.0 / 2;

        let weight = item
            .net_weight
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let price = format_price(item.price);
        let dates = [
            format!("PKD: {}", format_date(item.packed_on.as_deref())),
            format!("EXP: {}", format_date(item.expires_on.as_deref())),
        ];
        for line in weight.into_iter().chain(price).chain(dates) {
            let line = sanitize(truncate_chars(&line, p.text_chars + 6));
            z.push_str(&format!(
                "^FO{x},{y}^A0N,{},{}^FD{line}^FS\n",
                p.small_font.0, p.small_font.1
            ));
            y += p.small_font.0 + 8;
        }

        let barcode_x = p.width_dots * 45 / 100;
        let barcode_y = p.margin_dots + p.font.0 / 2;
        let readable = if human_readable { 'Y' } else { 'N' };
        z.push_str(&format!("^BY{},2,{}\n", p.module_width, p.barcode_height));
        z.push_str(&format!(
            "^FO{barcode_x},{barcode_y}^BCN,{},{readable},N,N^FD{}^FS\n",
            p.barcode_height,
            sanitize(&item.barcode)
        ));

        z.push_str("^XZ");
        z
    }
}

/// Strip ZPL control characters from field data
fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '^' | '~')).collect()
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
