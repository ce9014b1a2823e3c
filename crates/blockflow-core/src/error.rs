//! Error types shared across the pipeline.

use thiserror::Error;

/// Errors produced while reconciling detector, order, and OCR outputs.
///
/// Failures from the external collaborators (detector, order estimator, text
/// recognizer) propagate through the `Detection` / `Ordering` /
/// `Recognition` variants. Capacity overflow is never an error; it is
/// handled by the degradation policy and reported through logging.
#[derive(Error, Debug)]
pub enum BlockflowError {
    /// Layout detection failed for the batch
    #[error("layout detection failed: {reason}")]
    Detection {
        /// What went wrong
        reason: String,
    },

    /// Reading-order estimation failed for a call the capacity rule allowed
    #[error("order estimation failed: {reason}")]
    Ordering {
        /// What went wrong
        reason: String,
    },

    /// Text recognition failed before producing any output
    #[error("text recognition failed: {reason}")]
    Recognition {
        /// What went wrong
        reason: String,
    },

    /// The recognizer returned a different number of text segments than
    /// sub-images submitted.
    ///
    /// Fatal by design: accepting a shorter result would assign arbitrary
    /// blocks the wrong text, which is worse than failing the document.
    #[error("OCR returned {returned} text segments for {expected} images")]
    OcrMisalignment {
        /// Number of sub-images submitted
        expected: usize,
        /// Number of text segments returned
        returned: usize,
    },

    /// The layout and OCR rasterizations disagree on page count
    #[error("layout run has {layout_pages} pages but OCR run has {ocr_pages}")]
    PageCountMismatch {
        /// Pages in the layout-resolution raster set
        layout_pages: usize,
        /// Pages in the OCR-resolution raster set
        ocr_pages: usize,
    },

    /// A page raster does not carry the resolution the configuration declares
    #[error("page {page_index} rasterized at {found} ppi, expected {expected}")]
    PpiMismatch {
        /// Offending page
        page_index: usize,
        /// Resolution declared in the configuration
        expected: f32,
        /// Resolution tagged on the raster
        found: f32,
    },

    /// Invalid configuration
    #[error("invalid configuration: {reason}")]
    Config {
        /// What is invalid
        reason: String,
    },

    /// Writing the final record set failed
    #[error("export failed: {reason}")]
    Export {
        /// What went wrong
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for `Result` with [`BlockflowError`].
pub type Result<T> = std::result::Result<T, BlockflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misalignment_names_both_counts() {
        let err = BlockflowError::OcrMisalignment {
            expected: 3,
            returned: 2,
        };
        assert_eq!(err.to_string(), "OCR returned 2 text segments for 3 images");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BlockflowError = io.into();
        assert!(matches!(err, BlockflowError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
