//! Seams for the external model collaborators.
//!
//! The pipeline does not own any weights or inference runtime. Layout
//! detection, reading-order estimation, and text recognition arrive behind
//! these traits; callers plug in whatever backend actually runs the models.
//! The contracts below are what the reconciliation logic depends on; a
//! conforming implementation needs nothing else.

use blockflow_core::{BBox, PageImage, PageLayout, Result};
use image::GrayImage;

/// Per-page block/layout detection.
pub trait LayoutDetector {
    /// Detect content blocks on each page.
    ///
    /// Must return exactly one [`PageLayout`] per input page, in input order,
    /// with `page_index` matching the page's position in `pages` and block
    /// ids assigned in detector output order. Block geometry is expressed in
    /// pixels of the given rasters.
    fn detect(&self, pages: &[PageImage]) -> Result<Vec<PageLayout>>;
}

/// One page handed to the order estimator: its raster and the bboxes to rank.
#[derive(Debug)]
pub struct OrderRequest<'a> {
    /// Page raster at the layout resolution
    pub image: &'a PageImage,
    /// Block bboxes to rank, in block-index order
    pub bboxes: Vec<BBox>,
}

/// Reading-order estimation, subject to a hard capacity ceiling.
///
/// The model scores at most `C` blocks per page-equivalent call; the
/// orchestrator in [`crate::ordering`] guarantees no request handed to an
/// implementation exceeds that ceiling, so implementations do not need their
/// own overflow handling.
pub trait OrderEstimator {
    /// Predict reading-order positions for each request.
    ///
    /// Must return one position list per request, in request order;
    /// `positions[i]` is the predicted 0-based rank of `bboxes[i]` within its
    /// page. A list shorter than its bbox set is tolerated downstream (the
    /// uncovered blocks fall back to the unranked sentinel), but a conforming
    /// implementation returns one position per bbox.
    fn estimate(&self, requests: &[OrderRequest<'_>]) -> Result<Vec<Vec<i32>>>;
}

/// Batch text recognition over cropped block images.
pub trait TextRecognizer {
    /// Recognize one text string per input image, in input order.
    ///
    /// The 1:1, order-preserving correspondence is part of the contract: an
    /// implementation that cannot produce a segment for every input must
    /// fail with [`blockflow_core::BlockflowError::OcrMisalignment`] rather
    /// than return a shorter list.
    fn recognize(&self, images: &[GrayImage], language: &str) -> Result<Vec<String>>;
}
