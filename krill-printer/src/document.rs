//! PDF label document assembly
//!
//! Produces one page per (item, copy) using the layout engine's placements
//! and the barcode renderer's raster. The assembler owns page order and
//! serialization only; it never talks to the OS.

use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfLayerReference, Px,
};
use tracing::{instrument, warn};

use shared::models::{LabelItem, PrintOptions};

use crate::barcode::{self, BarcodeImage};
use crate::error::{PrintError, PrintResult};
use crate::layout::{BarcodeBox, LabelLayout, TextPlacement};
use crate::metrics::Face;
use crate::render::Artifact;
use crate::units::{MM_PER_INCH, Unit, to_dots};

/// Physical bar height requested from the encoder; the layout engine may
/// shrink the final box but never stretches past the source aspect ratio
const BAR_HEIGHT_MM: f32 = 12.0;

/// Narrow module width in dots at 203 dpi; doubled at 300 dpi
const MODULE_DOTS_203: u32 = 2;
const MODULE_DOTS_300: u32 = 3;

/// PDF rendering path
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    /// Render the full item set to a paginated PDF artifact
    ///
    /// Barcodes are encoded once per item on the blocking pool and joined
    /// back in input order, so page order always follows item order. An
    /// item whose payload fails to encode still gets its pages, with the
    /// barcode region left blank.
    #[instrument(skip(self, items, options), fields(items = items.len(), copies = options.copies))]
    pub async fn render(
        &self,
        items: &[LabelItem],
        options: &PrintOptions,
    ) -> PrintResult<Artifact> {
        let barcodes = encode_barcodes(items, options).await;

        let (page_w, page_h) = options.paper_size.dimensions_mm();
        let copies = options.copies.max(1);

        let (doc, first_page, first_layer) =
            PdfDocument::new("labels", Mm(page_w), Mm(page_h), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PrintError::Document(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PrintError::Document(e.to_string()))?;

        let mut on_first_page = true;
        for (item, barcode) in items.iter().zip(&barcodes) {
            let layout = LabelLayout::compute(
                item,
                options.paper_size,
                barcode.as_ref().map(|b| (b.width, b.height)),
                options.human_readable,
            );

            for _ in 0..copies {
                let layer = if on_first_page {
                    on_first_page = false;
                    doc.get_page(first_page).get_layer(first_layer)
                } else {
                    let (page, layer) = doc.add_page(Mm(page_w), Mm(page_h), "Layer 1");
                    doc.get_page(page).get_layer(layer)
                };
                draw_label(&layer, &layout, barcode.as_ref(), &regular, &bold);
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| PrintError::Document(e.to_string()))?;
        Ok(Artifact::Pdf(bytes))
    }
}

/// Encode every item's barcode, in parallel, joined in input order
async fn encode_barcodes(
    items: &[LabelItem],
    options: &PrintOptions,
) -> Vec<Option<BarcodeImage>> {
    let dpi = options.dpi.dots_per_inch();
    let bar_height = to_dots(BAR_HEIGHT_MM, Unit::Mm, dpi).round() as u32;
    let module_width = match options.dpi {
        shared::models::Dpi::Dpi203 => MODULE_DOTS_203,
        shared::models::Dpi::Dpi300 => MODULE_DOTS_300,
    };

    let handles: Vec<_> = items
        .iter()
        .map(|item| {
            let payload = item.barcode.clone();
            tokio::task::spawn_blocking(move || {
                barcode::render_code128(&payload, bar_height, module_width)
            })
        })
        .collect();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .zip(items)
        .map(|(joined, item)| match joined {
            Ok(Ok(barcode)) => Some(barcode),
            Ok(Err(e)) => {
                warn!(item = %item.id, error = %e, "barcode encoding failed, leaving region blank");
                None
            }
            Err(e) => {
                warn!(item = %item.id, error = %e, "barcode task panicked, leaving region blank");
                None
            }
        })
        .collect()
}

fn draw_label(
    layer: &PdfLayerReference,
    layout: &LabelLayout,
    barcode: Option<&BarcodeImage>,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    draw_text(layer, &layout.title, regular, bold);
    for placement in &layout.amounts {
        draw_text(layer, placement, regular, bold);
    }
    for placement in &layout.dates {
        draw_text(layer, placement, regular, bold);
    }
    if let (Some(image), Some(bbox)) = (barcode, &layout.barcode) {
        embed_barcode(layer, image, bbox);
    }
    if let Some(caption) = &layout.caption {
        draw_text(layer, caption, regular, bold);
    }
}

fn draw_text(
    layer: &PdfLayerReference,
    placement: &TextPlacement,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let font = match placement.face {
        Face::Helvetica => regular,
        Face::HelveticaBold => bold,
    };
    layer.use_text(
        placement.text.clone(),
        placement.size_pt,
        Mm(placement.x_mm),
        Mm(placement.baseline_mm),
        font,
    );
}

fn embed_barcode(layer: &PdfLayerReference, barcode: &BarcodeImage, bbox: &BarcodeBox) {
    let gray = barcode.image.to_luma8();
    let (width_px, height_px) = gray.dimensions();

    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Greyscale,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: gray.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // The layout box preserves the source aspect ratio, so one dpi derived
    // from the width also lands the height on target.
    // DPI = pixels / (mm / 25.4)
    let dpi = width_px as f32 / (bbox.width_mm / MM_PER_INCH);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(bbox.x_mm)),
            translate_y: Some(Mm(bbox.y_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

/// The (item index, copy index) sequence the assembler emits pages in
pub fn page_plan(item_count: usize, copies: u32) -> Vec<(usize, u32)> {
    let copies = copies.max(1);
    (0..item_count)
        .flat_map(|item| (0..copies).map(move |copy| (item, copy)))
        .collect()
}
