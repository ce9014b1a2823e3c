//! Per-block sub-image extraction from the OCR-resolution rasters.

use blockflow_core::{BlockId, BlockflowError, LayoutRow, LayoutTable, PageImage, Result};
use image::imageops;
use image::GrayImage;
use log::warn;
use rayon::prelude::*;

/// One cropped block, ready for text recognition.
///
/// The crop keeps its [`BlockId`] so recognized text can be rejoined to the
/// layout table without relying on position or geometry.
#[derive(Debug, Clone)]
pub struct BlockCrop {
    /// Identity of the source block
    pub id: BlockId,
    /// Grayscale sub-image at the OCR resolution
    pub image: GrayImage,
}

/// Crop one grayscale sub-image per eligible block.
///
/// Row geometry (at `table.layout_ppi`) is rescaled into the `ocr_ppi` pixel
/// space with the given content `buffer`, clamped to the page raster, and
/// cropped out of the page. A page whose row count meets or exceeds
/// `capacity` is skipped entirely, consistent with the ordering stage's
/// treatment of such pages, and its blocks simply never reach the
/// recognizer.
///
/// Pages are processed in parallel; results are collected positionally and
/// flattened in page order, so the output sequence does not depend on
/// scheduling. Within a page, crops follow the table's row order.
pub fn crop_blocks(
    ocr_pages: &[PageImage],
    table: &LayoutTable,
    ocr_ppi: f32,
    buffer: f32,
    capacity: usize,
) -> Result<Vec<BlockCrop>> {
    let mut rows_by_page: Vec<Vec<&LayoutRow>> = vec![Vec::new(); ocr_pages.len()];
    for row in &table.rows {
        let page_rows = rows_by_page.get_mut(row.id.page_index).ok_or_else(|| {
            BlockflowError::Detection {
                reason: format!(
                    "block {:?} references page {} but only {} OCR rasters were supplied",
                    row.id,
                    row.id.page_index,
                    ocr_pages.len()
                ),
            }
        })?;
        page_rows.push(row);
    }

    let layout_ppi = table.layout_ppi;
    let per_page: Vec<Vec<BlockCrop>> = ocr_pages
        .par_iter()
        .zip(rows_by_page)
        .enumerate()
        .map(|(page_index, (page, rows))| {
            if rows.len() >= capacity {
                warn!(
                    "page {page_index} has {} blocks (capacity {capacity}); \
                     skipping text recognition for the whole page",
                    rows.len()
                );
                return Vec::new();
            }
            crop_page(page, &rows, layout_ppi, ocr_ppi, buffer)
        })
        .collect();

    Ok(per_page.into_iter().flatten().collect())
}

fn crop_page(
    page: &PageImage,
    rows: &[&LayoutRow],
    layout_ppi: f32,
    ocr_ppi: f32,
    buffer: f32,
) -> Vec<BlockCrop> {
    if rows.is_empty() {
        return Vec::new();
    }
    let gray = page.image.to_luma8();
    let (width, height) = (page.width(), page.height());

    rows.iter()
        .map(|row| {
            let scaled = row
                .bbox
                .between_resolutions(layout_ppi, ocr_ppi, buffer)
                .clamped(width, height);
            let x = scaled.l as u32;
            let y = scaled.t as u32;
            let crop_width = scaled.width() as u32;
            let crop_height = scaled.height() as u32;
            BlockCrop {
                id: row.id,
                image: imageops::crop_imm(&gray, x, y, crop_width, crop_height).to_image(),
            }
        })
        .collect()
}
