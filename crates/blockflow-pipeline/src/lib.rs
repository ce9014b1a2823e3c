//! # blockflow-pipeline: layout / reading-order / OCR reconciliation
//!
//! This crate turns a rendered document page set into a reading-order-sorted
//! table of text blocks by reconciling three independently run, independently
//! configured subsystems:
//!
//! 1. a **layout detector** producing per-page block geometry,
//! 2. a **reading-order estimator** with a hard per-call capacity ceiling,
//! 3. a **text recognizer** operating on a possibly different rasterization
//!    of the same pages.
//!
//! The stages run in a fixed, deterministic sequence per document:
//!
//! ```text
//! detect -> order -> layout table -> rescale -> crop -> recognize -> merge
//! ```
//!
//! The three subsystems sit behind the traits in [`models`]; the rest of the
//! crate is the reconciliation itself: capacity-gated order estimation with
//! graceful degradation ([`ordering`]), the BlockId-keyed ordered layout
//! table ([`layout_table`]), cross-resolution cropping ([`crop`]), a
//! Tesseract-backed recognizer ([`tesseract`]), and the final left join of
//! geometry with text ([`merge`]). [`parser::DocumentParser`] wires the
//! stages together.
//!
//! ## Quick start
//!
//! ```no_run
//! use blockflow_pipeline::{DocumentParser, ParserConfig, TesseractRecognizer};
//! # use blockflow_core::{PageImage, PageLayout, Result};
//! # struct MyDetector;
//! # impl blockflow_pipeline::LayoutDetector for MyDetector {
//! #     fn detect(&self, _: &[PageImage]) -> Result<Vec<PageLayout>> { unimplemented!() }
//! # }
//! # struct MyEstimator;
//! # impl blockflow_pipeline::OrderEstimator for MyEstimator {
//! #     fn estimate(&self, _: &[blockflow_pipeline::OrderRequest<'_>]) -> Result<Vec<Vec<i32>>> { unimplemented!() }
//! # }
//! # fn rasterize(_: f32) -> Vec<PageImage> { unimplemented!() }
//!
//! # fn main() -> Result<()> {
//! let config = ParserConfig::builder()
//!     .layout_ppi(96.0)
//!     .ocr_ppi(150.0)
//!     .language("eng")
//!     .build()?;
//!
//! let parser = DocumentParser::new(
//!     Box::new(MyDetector),
//!     Box::new(MyEstimator),
//!     Box::new(TesseractRecognizer::default()),
//!     config,
//! );
//!
//! let layout_pages = rasterize(96.0);
//! let ocr_pages = rasterize(150.0);
//! let records = parser.parse(&layout_pages, &ocr_pages)?;
//! for record in &records {
//!     println!("{} {} {:?}", record.page_index, record.position, record.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod crop;
pub mod export;
pub mod layout_table;
pub mod merge;
pub mod models;
pub mod ordering;
pub mod parser;
pub mod tesseract;

pub use crop::{crop_blocks, BlockCrop};
pub use layout_table::build_layout_table;
pub use merge::merge_layout_ocr;
pub use models::{LayoutDetector, OrderEstimator, OrderRequest, TextRecognizer};
pub use ordering::{estimate_reading_order, PageOrderEstimate};
pub use parser::{DocumentParser, ParserConfig, ParserConfigBuilder};
pub use tesseract::TesseractRecognizer;

pub use blockflow_core::{
    BBox, Block, BlockId, BlockflowError, LayoutRecord, LayoutRow, LayoutTable, PageImage,
    PageLayout, Result, ORDER_UNRANKED,
};
