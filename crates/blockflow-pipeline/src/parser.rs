//! The document parser facade: one call from page rasters to merged records.

use std::collections::HashMap;

use blockflow_core::{
    BlockId, BlockflowError, LayoutRecord, PageImage, Result,
};
use image::GrayImage;
use log::{debug, info};

use crate::crop::crop_blocks;
use crate::layout_table::build_layout_table;
use crate::merge::merge_layout_ocr;
use crate::models::{LayoutDetector, OrderEstimator, TextRecognizer};
use crate::ordering::estimate_reading_order;

/// Hard per-call block limit of the order-estimation model.
pub const DEFAULT_CAPACITY_CEILING: usize = 255;

/// Content buffer, in layout-space pixels, applied when the layout and OCR
/// rasterizations differ in resolution.
pub const DEFAULT_CROP_BUFFER: f32 = 2.0;

/// Pipeline configuration.
///
/// `layout_ppi` and `ocr_ppi` declare the resolutions the caller rasterized
/// at; [`DocumentParser::parse`] checks the supplied rasters against them.
/// The two may be equal, in which case no geometric buffer is applied when
/// cropping.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Rasterization resolution for detection and ordering, in ppi
    pub layout_ppi: f32,
    /// Rasterization resolution for text recognition, in ppi
    pub ocr_ppi: f32,
    /// OCR language code (e.g. "eng")
    pub language: String,
    /// Per-call block ceiling of the order model
    pub capacity_ceiling: usize,
    /// Crop buffer override, in layout-space pixels. `None` selects 0 for
    /// equal resolutions and [`DEFAULT_CROP_BUFFER`] otherwise.
    pub crop_buffer: Option<f32>,
    /// Block-count ceiling above which a page is excluded from OCR cropping.
    /// `None` reuses `capacity_ceiling`, keeping cropper semantics aligned
    /// with the pages that received degraded positions. Set explicitly to
    /// decouple the two policies.
    pub crop_capacity: Option<usize>,
}

impl Default for ParserConfig {
    #[inline]
    fn default() -> Self {
        Self {
            layout_ppi: 150.0,
            ocr_ppi: 150.0,
            language: "eng".to_string(),
            capacity_ceiling: DEFAULT_CAPACITY_CEILING,
            crop_buffer: None,
            crop_capacity: None,
        }
    }
}

impl ParserConfig {
    /// Start building a configuration.
    #[inline]
    #[must_use = "returns a new builder with default settings"]
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }

    /// The crop buffer actually applied: the override if set, otherwise 0
    /// for equal resolutions and [`DEFAULT_CROP_BUFFER`] across resolutions.
    #[inline]
    #[must_use = "buffer is computed but not used"]
    pub fn effective_crop_buffer(&self) -> f32 {
        self.crop_buffer.unwrap_or(if self.layout_ppi == self.ocr_ppi {
            0.0
        } else {
            DEFAULT_CROP_BUFFER
        })
    }

    /// The page-skip ceiling the cropper applies.
    #[inline]
    #[must_use = "ceiling is computed but not used"]
    pub fn effective_crop_capacity(&self) -> usize {
        self.crop_capacity.unwrap_or(self.capacity_ceiling)
    }
}

/// Builder for [`ParserConfig`] with validation at `build`.
///
/// # Examples
///
/// ```
/// use blockflow_pipeline::ParserConfig;
///
/// # fn main() -> blockflow_core::Result<()> {
/// let config = ParserConfig::builder()
///     .layout_ppi(96.0)
///     .ocr_ppi(150.0)
///     .language("deu")
///     .build()?;
/// assert_eq!(config.effective_crop_buffer(), 2.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// Set the detection/ordering rasterization resolution.
    #[must_use = "returns the builder for chaining"]
    pub fn layout_ppi(mut self, ppi: f32) -> Self {
        self.config.layout_ppi = ppi;
        self
    }

    /// Set the text-recognition rasterization resolution.
    #[must_use = "returns the builder for chaining"]
    pub fn ocr_ppi(mut self, ppi: f32) -> Self {
        self.config.ocr_ppi = ppi;
        self
    }

    /// Set the OCR language code.
    #[must_use = "returns the builder for chaining"]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// Set the order model's per-call block ceiling.
    #[must_use = "returns the builder for chaining"]
    pub fn capacity_ceiling(mut self, ceiling: usize) -> Self {
        self.config.capacity_ceiling = ceiling;
        self
    }

    /// Override the crop buffer.
    #[must_use = "returns the builder for chaining"]
    pub fn crop_buffer(mut self, buffer: f32) -> Self {
        self.config.crop_buffer = Some(buffer);
        self
    }

    /// Decouple the cropper's page-skip ceiling from the ordering ceiling.
    #[must_use = "returns the builder for chaining"]
    pub fn crop_capacity(mut self, ceiling: usize) -> Self {
        self.config.crop_capacity = Some(ceiling);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<ParserConfig> {
        let config = self.config;
        if !(config.layout_ppi.is_finite() && config.layout_ppi > 0.0) {
            return Err(BlockflowError::Config {
                reason: format!("layout_ppi must be positive, got {}", config.layout_ppi),
            });
        }
        if !(config.ocr_ppi.is_finite() && config.ocr_ppi > 0.0) {
            return Err(BlockflowError::Config {
                reason: format!("ocr_ppi must be positive, got {}", config.ocr_ppi),
            });
        }
        if config.language.is_empty() {
            return Err(BlockflowError::Config {
                reason: "language must not be empty".to_string(),
            });
        }
        if config.capacity_ceiling == 0 {
            return Err(BlockflowError::Config {
                reason: "capacity_ceiling must be at least 1".to_string(),
            });
        }
        if let Some(buffer) = config.crop_buffer {
            if !(buffer.is_finite() && buffer >= 0.0) {
                return Err(BlockflowError::Config {
                    reason: format!("crop_buffer must be non-negative, got {buffer}"),
                });
            }
        }
        if config.crop_capacity == Some(0) {
            return Err(BlockflowError::Config {
                reason: "crop_capacity must be at least 1".to_string(),
            });
        }
        Ok(config)
    }
}

/// End-to-end document parser over pluggable model backends.
///
/// Owns the three external collaborators and runs the fixed stage sequence:
/// detect → order → layout table → crop → recognize → merge. All stages are
/// deterministic for a given set of model outputs; row order of the result
/// is fully determined by the layout table's sort.
pub struct DocumentParser {
    detector: Box<dyn LayoutDetector>,
    estimator: Box<dyn OrderEstimator>,
    recognizer: Box<dyn TextRecognizer>,
    config: ParserConfig,
}

impl DocumentParser {
    /// Assemble a parser from its collaborators and configuration.
    #[must_use = "parser is created but not used"]
    pub fn new(
        detector: Box<dyn LayoutDetector>,
        estimator: Box<dyn OrderEstimator>,
        recognizer: Box<dyn TextRecognizer>,
        config: ParserConfig,
    ) -> Self {
        Self {
            detector,
            estimator,
            recognizer,
            config,
        }
    }

    /// The active configuration.
    #[inline]
    #[must_use = "configuration is read but not used"]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one document: two rasterizations of the same page set in, one
    /// reading-order-sorted record per detected block out.
    ///
    /// `layout_pages` must be rasterized at the configured `layout_ppi` and
    /// `ocr_pages` at `ocr_ppi`; both sets must cover the same pages in the
    /// same order.
    pub fn parse(
        &self,
        layout_pages: &[PageImage],
        ocr_pages: &[PageImage],
    ) -> Result<Vec<LayoutRecord>> {
        if layout_pages.len() != ocr_pages.len() {
            return Err(BlockflowError::PageCountMismatch {
                layout_pages: layout_pages.len(),
                ocr_pages: ocr_pages.len(),
            });
        }
        check_ppi(layout_pages, self.config.layout_ppi)?;
        check_ppi(ocr_pages, self.config.ocr_ppi)?;

        info!(
            "parsing document: {} pages (layout {} ppi, ocr {} ppi)",
            layout_pages.len(),
            self.config.layout_ppi,
            self.config.ocr_ppi
        );

        let layouts = self.detector.detect(layout_pages)?;
        if layouts.len() != layout_pages.len() {
            return Err(BlockflowError::Detection {
                reason: format!(
                    "detector returned {} page layouts for {} pages",
                    layouts.len(),
                    layout_pages.len()
                ),
            });
        }
        for (index, layout) in layouts.iter().enumerate() {
            if layout.page_index != index {
                return Err(BlockflowError::Detection {
                    reason: format!(
                        "detector returned page_index {} at position {index}",
                        layout.page_index
                    ),
                });
            }
        }
        let total_blocks: usize = layouts.iter().map(|l| l.block_count()).sum();
        debug!("detected {total_blocks} blocks");

        let estimates = estimate_reading_order(
            self.estimator.as_ref(),
            layout_pages,
            &layouts,
            self.config.capacity_ceiling,
        )?;

        let table = build_layout_table(&layouts, &estimates, self.config.layout_ppi)?;

        let crops = crop_blocks(
            ocr_pages,
            &table,
            self.config.ocr_ppi,
            self.config.effective_crop_buffer(),
            self.config.effective_crop_capacity(),
        )?;
        debug!("cropped {} of {} blocks for recognition", crops.len(), table.len());

        let (ids, images): (Vec<BlockId>, Vec<GrayImage>) = crops
            .into_iter()
            .map(|crop| (crop.id, crop.image))
            .unzip();
        let texts = self.recognizer.recognize(&images, &self.config.language)?;
        // A zip would silently truncate; enforce the 1:1 contract here too
        if texts.len() != ids.len() {
            return Err(BlockflowError::OcrMisalignment {
                expected: ids.len(),
                returned: texts.len(),
            });
        }

        let text_by_id: HashMap<BlockId, String> = ids.into_iter().zip(texts).collect();
        Ok(merge_layout_ocr(table, text_by_id))
    }
}

fn check_ppi(pages: &[PageImage], expected: f32) -> Result<()> {
    for (page_index, page) in pages.iter().enumerate() {
        if (page.ppi - expected).abs() > f32::EPSILON {
            return Err(BlockflowError::PpiMismatch {
                page_index,
                expected,
                found: page.ppi,
            });
        }
    }
    Ok(())
}
