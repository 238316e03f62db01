/// Printable PDF composition
///
/// Downloads each selected photo once, then renders the planned 2x2 pages
/// with printpdf: US Letter landscape, photos contain-fitted into fixed
/// cells, the display code in the cell corner, and an optional decorative
/// frame image stretched over every cell.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use image::DynamicImage;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Px, Rgb,
};
use thiserror::Error;
use tokio::task;

use super::layout;
use crate::api::{ApiClient, ApiError};
use crate::state::data::Photography;

// Page geometry in PDF points, taken from the shop's print template:
// US Letter landscape (792x612), 20pt page padding, 10pt gap between
// cells, which leaves two 371x281 cells per row. Each cell keeps a 10pt
// inner padding around its photo.
const PAGE_WIDTH_PT: f32 = 792.0;
const PAGE_HEIGHT_PT: f32 = 612.0;
const PAGE_MARGIN_PT: f32 = 20.0;
const CELL_GAP_PT: f32 = 10.0;
const CELL_WIDTH_PT: f32 = 371.0;
const CELL_HEIGHT_PT: f32 = 281.0;
const CELL_PADDING_PT: f32 = 10.0;

const CODE_FONT_SIZE: f32 = 10.0;
// Brick red, matching the template's #812710
const CODE_COLOR: (f32, f32, f32) = (0.506, 0.153, 0.063);

/// PDF generation failure. Cloneable because it travels inside iced
/// messages.
#[derive(Debug, Clone, Error)]
pub enum PdfError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not decode image for {code}: {message}")]
    Decode { code: String, message: String },
    #[error("could not write PDF: {0}")]
    Write(String),
    #[error("no photos to print")]
    Empty,
}

/// A finished PDF on disk
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub path: PathBuf,
    pub page_count: usize,
}

/// Download the photos and compose the printable PDF into a temp file.
///
/// Each unique URL is fetched exactly once even when the photo appears
/// several times in the print batch. Composition runs on a blocking task
/// because image decoding is CPU-heavy.
pub async fn generate(
    client: ApiClient,
    photos: Vec<Photography>,
    frame_path: Option<PathBuf>,
) -> Result<RenderedPdf, PdfError> {
    if photos.is_empty() {
        return Err(PdfError::Empty);
    }

    let mut downloads: HashMap<String, Vec<u8>> = HashMap::new();
    for photo in &photos {
        if !downloads.contains_key(&photo.url) {
            println!("⬇️  Fetching {}...", photo.code);
            let bytes = client.fetch_bytes(&photo.url).await?;
            downloads.insert(photo.url.clone(), bytes);
        }
    }

    let frame = frame_path.and_then(|path| match image::open(&path) {
        Ok(image) => Some(image),
        Err(error) => {
            eprintln!("⚠️  Ignoring frame image {}: {}", path.display(), error);
            None
        }
    });

    let page_count = layout::page_count(photos.len());
    let bytes = task::spawn_blocking(move || compose(&photos, &downloads, frame.as_ref()))
        .await
        .map_err(|error| PdfError::Write(format!("task join error: {}", error)))??;

    let path = output_path();
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|error| PdfError::Write(error.to_string()))?;

    println!("📄 PDF written to {} ({} page(s))", path.display(), page_count);

    Ok(RenderedPdf { path, page_count })
}

/// Compose the whole document in memory
fn compose(
    photos: &[Photography],
    downloads: &HashMap<String, Vec<u8>>,
    frame: Option<&DynamicImage>,
) -> Result<Vec<u8>, PdfError> {
    // Decode once per unique URL; the same photo may fill several slots
    let mut decoded: HashMap<&str, DynamicImage> = HashMap::new();
    for photo in photos {
        if decoded.contains_key(photo.url.as_str()) {
            continue;
        }
        let bytes = downloads.get(&photo.url).ok_or_else(|| PdfError::Decode {
            code: photo.code.clone(),
            message: "image was not downloaded".to_string(),
        })?;
        let image = image::load_from_memory(bytes).map_err(|error| PdfError::Decode {
            code: photo.code.clone(),
            message: error.to_string(),
        })?;
        decoded.insert(photo.url.as_str(), image);
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Photographs",
        mm(PAGE_WIDTH_PT),
        mm(PAGE_HEIGHT_PT),
        "photos",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|error| PdfError::Write(error.to_string()))?;

    let pages = layout::plan_pages(photos);
    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_ref, layer_ref) =
                doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "photos");
            doc.get_page(page_ref).get_layer(layer_ref)
        };

        println!("🖼  Page {}: {} photo(s)", index + 1, page.filled());

        for (row_index, slots) in page.rows().enumerate() {
            for (column_index, photo) in slots.iter().enumerate() {
                let Some(photo) = photo else { continue };
                let slot = row_index * layout::PAGE_COLUMNS + column_index;
                let image = &decoded[photo.url.as_str()];
                draw_cell(&layer, &font, slot, photo, image, frame);
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|error| PdfError::Write(error.to_string()))
}

/// Draw one photo cell: contain-fitted photo, optional frame overlay, and
/// the display code in the top-right corner.
fn draw_cell(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    slot: usize,
    photo: &Photography,
    image: &DynamicImage,
    frame: Option<&DynamicImage>,
) {
    let (cell_x, cell_bottom) = cell_origin(slot);
    let cell_top = cell_bottom + CELL_HEIGHT_PT;

    // Photo, centered inside the padded cell
    let inner_width = CELL_WIDTH_PT - 2.0 * CELL_PADDING_PT;
    let inner_height = CELL_HEIGHT_PT - 2.0 * CELL_PADDING_PT;
    let (width_px, height_px, pixels) = flatten_to_rgb(image);
    let (target_width, target_height) = fit_within(
        width_px as f32,
        height_px as f32,
        inner_width,
        inner_height,
    );
    let photo_x = cell_x + CELL_PADDING_PT + (inner_width - target_width) / 2.0;
    let photo_y = cell_bottom + CELL_PADDING_PT + (inner_height - target_height) / 2.0;
    // DPI picked so the pixel width lands exactly on the target size
    let dpi = width_px as f32 * 72.0 / target_width;

    let xobject = rgb_xobject(width_px, height_px, pixels);
    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(photo_x)),
            translate_y: Some(mm(photo_y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    // Decorative frame stretched over the whole cell
    if let Some(frame) = frame {
        let (frame_width, frame_height, frame_pixels) = flatten_to_rgb(frame);
        let xobject = rgb_xobject(frame_width, frame_height, frame_pixels);
        Image::from(xobject).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(mm(cell_x)),
                translate_y: Some(mm(cell_bottom)),
                // At 72 dpi one pixel is one point, so plain scale factors
                // stretch the frame to the cell
                dpi: Some(72.0),
                scale_x: Some(CELL_WIDTH_PT / frame_width as f32),
                scale_y: Some(CELL_HEIGHT_PT / frame_height as f32),
                ..Default::default()
            },
        );
    }

    // Display code in the top-right corner of the cell
    let (red, green, blue) = CODE_COLOR;
    layer.set_fill_color(Color::Rgb(Rgb::new(red, green, blue, None)));
    layer.use_text(
        &photo.code,
        CODE_FONT_SIZE,
        mm(cell_x + CELL_WIDTH_PT - 35.0),
        mm(cell_top - 18.0),
        font,
    );
}

/// Bottom-left corner of a slot's cell, in points from the page origin
fn cell_origin(slot: usize) -> (f32, f32) {
    let row = slot / layout::PAGE_COLUMNS;
    let column = slot % layout::PAGE_COLUMNS;

    let x = PAGE_MARGIN_PT + column as f32 * (CELL_WIDTH_PT + CELL_GAP_PT);
    let bottom = PAGE_HEIGHT_PT
        - PAGE_MARGIN_PT
        - CELL_HEIGHT_PT
        - row as f32 * (CELL_HEIGHT_PT + CELL_GAP_PT);
    (x, bottom)
}

/// Contain-fit: the largest size with the source aspect ratio that still
/// fits inside the bounds
fn fit_within(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    let scale = (max_width / width).min(max_height / height);
    (width * scale, height * scale)
}

/// Composite against white and strip the alpha channel; printpdf wants
/// plain RGB data.
fn flatten_to_rgb(image: &DynamicImage) -> (u32, u32, Vec<u8>) {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgba.pixels() {
        let image::Rgba([red, green, blue, alpha]) = *pixel;
        let alpha = alpha as f32 / 255.0;
        let background = 255.0;
        rgb.push((red as f32 * alpha + background * (1.0 - alpha)) as u8);
        rgb.push((green as f32 * alpha + background * (1.0 - alpha)) as u8);
        rgb.push((blue as f32 * alpha + background * (1.0 - alpha)) as u8);
    }

    (width, height, rgb)
}

fn rgb_xobject(width: u32, height: u32, pixels: Vec<u8>) -> ImageXObject {
    ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: pixels,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    }
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn output_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "photo-print-{}.pdf",
        Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_origins_form_a_2x2_grid() {
        let (x0, y0) = cell_origin(0);
        let (x1, y1) = cell_origin(1);
        let (x2, y2) = cell_origin(2);
        let (x3, y3) = cell_origin(3);

        // Top row sits above the bottom row, columns share x positions
        assert_eq!(x0, x2);
        assert_eq!(x1, x3);
        assert_eq!(y0, y1);
        assert_eq!(y2, y3);
        assert!(y0 > y2);

        // Horizontal gap between the two columns
        assert_eq!(x1 - (x0 + CELL_WIDTH_PT), CELL_GAP_PT);
        // Vertical gap between the two rows
        assert_eq!(y0 - (y2 + CELL_HEIGHT_PT), CELL_GAP_PT);

        // The grid fills the page inside the margins
        assert_eq!(x0, PAGE_MARGIN_PT);
        assert_eq!(y0 + CELL_HEIGHT_PT, PAGE_HEIGHT_PT - PAGE_MARGIN_PT);
        assert_eq!(x1 + CELL_WIDTH_PT, PAGE_WIDTH_PT - PAGE_MARGIN_PT);
        assert_eq!(y2, PAGE_MARGIN_PT);
    }

    #[test]
    fn test_fit_within_preserves_aspect_ratio() {
        // Wide source: width-constrained
        let (width, height) = fit_within(2000.0, 1000.0, 351.0, 261.0);
        assert_eq!(width, 351.0);
        assert_eq!(height, 175.5);

        // Tall source: height-constrained
        let (width, height) = fit_within(1000.0, 2000.0, 351.0, 261.0);
        assert_eq!(height, 261.0);
        assert_eq!(width, 130.5);
    }

    #[test]
    fn test_flatten_composites_alpha_over_white() {
        let mut rgba = image::RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([0, 0, 0, 128]));
        let image = DynamicImage::ImageRgba8(rgba);

        let (width, height, pixels) = flatten_to_rgb(&image);
        assert_eq!((width, height), (1, 1));
        // Half-transparent black over white lands mid-grey
        assert_eq!(pixels, vec![127, 127, 127]);
    }
}
