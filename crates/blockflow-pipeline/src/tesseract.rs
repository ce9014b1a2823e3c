//! Tesseract-backed text recognition.
//!
//! Drives the external `tesseract` executable over a whole batch of block
//! crops in one invocation: the crops are serialized into a single
//! multi-frame grayscale TIFF, Tesseract recognizes every frame in one run,
//! and its stdout is split back into per-frame text on the form-feed page
//! separator. The multi-frame file lives in a temp directory that is removed
//! when the call returns, on success and on every failure path alike.
//!
//! The split is strict: Tesseract appends a form feed after the final frame,
//! so one trailing empty segment is expected and dropped; any other count
//! mismatch aborts the batch with
//! [`BlockflowError::OcrMisalignment`](blockflow_core::BlockflowError::OcrMisalignment).
//! A shorter result silently zipped onto the inputs would caption arbitrary
//! blocks with the wrong text, which is the one failure this pipeline must
//! never absorb.

use std::fs::File;
use std::process::Command;

use blockflow_core::{BlockflowError, Result};
use image::GrayImage;
use log::debug;

use crate::models::TextRecognizer;

/// Form feed, Tesseract's page separator in stdout output.
const PAGE_SEPARATOR: char = '\u{c}';

/// [`TextRecognizer`] implementation shelling out to the Tesseract CLI.
///
/// # Examples
///
/// ```
/// use blockflow_pipeline::TesseractRecognizer;
///
/// let recognizer = TesseractRecognizer::new()
///     .with_oem(1)
///     .with_psm(3);
/// ```
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: String,
    oem: u32,
    psm: u32,
}

impl Default for TesseractRecognizer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TesseractRecognizer {
    /// Create a recognizer invoking `tesseract` from `PATH` with the LSTM
    /// engine (`--oem 1`) and automatic page segmentation (`--psm 3`).
    #[inline]
    #[must_use = "recognizer is created but not used"]
    pub fn new() -> Self {
        Self {
            command: "tesseract".to_string(),
            oem: 1,
            psm: 3,
        }
    }

    /// Use a specific Tesseract executable instead of resolving from `PATH`.
    #[must_use = "returns the recognizer with the command replaced"]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the OCR engine mode (`--oem`).
    #[must_use = "returns the recognizer with the engine mode replaced"]
    pub fn with_oem(mut self, oem: u32) -> Self {
        self.oem = oem;
        self
    }

    /// Set the page segmentation mode (`--psm`).
    #[must_use = "returns the recognizer with the segmentation mode replaced"]
    pub fn with_psm(mut self, psm: u32) -> Self {
        self.psm = psm;
        self
    }

    fn write_batch_tiff(&self, path: &std::path::Path, images: &[GrayImage]) -> Result<()> {
        let file = File::create(path)?;
        let mut encoder =
            tiff::encoder::TiffEncoder::new(file).map_err(|e| BlockflowError::Recognition {
                reason: format!("failed to start TIFF batch: {e}"),
            })?;
        for image in images {
            encoder
                .write_image::<tiff::encoder::colortype::Gray8>(
                    image.width(),
                    image.height(),
                    image.as_raw(),
                )
                .map_err(|e| BlockflowError::Recognition {
                    reason: format!("failed to append TIFF frame: {e}"),
                })?;
        }
        Ok(())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, images: &[GrayImage], language: &str) -> Result<Vec<String>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        // Dropped on every exit path, taking the batch TIFF with it
        let workdir = tempfile::tempdir()?;
        let tiff_path = workdir.path().join("blocks.tiff");
        self.write_batch_tiff(&tiff_path, images)?;

        debug!(
            "recognizing {} block images via {} (lang={language}, oem={}, psm={})",
            images.len(),
            self.command,
            self.oem,
            self.psm
        );

        let output = Command::new(&self.command)
            .arg(&tiff_path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--oem")
            .arg(self.oem.to_string())
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .map_err(|e| BlockflowError::Recognition {
                reason: format!("failed to invoke {}: {e}", self.command),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BlockflowError::Recognition {
                reason: format!("{} exited with {}: {}", self.command, output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        split_segments(&stdout, images.len())
    }
}

/// Split Tesseract stdout into exactly `expected` per-frame segments.
fn split_segments(raw: &str, expected: usize) -> Result<Vec<String>> {
    let mut segments: Vec<&str> = raw.split(PAGE_SEPARATOR).collect();
    // A single empty tail is the separator after the last frame, not a frame
    if segments.len() == expected + 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }
    if segments.len() != expected {
        return Err(BlockflowError::OcrMisalignment {
            expected,
            returned: segments.len(),
        });
    }
    Ok(segments
        .into_iter()
        .map(|segment| segment.trim_end().to_string())
        .collect())
}
