//! Writers for the final record set.
//!
//! Persistence proper (databases, archives) lives outside this crate; these
//! helpers only serialize the tabular boundary. Bboxes are written as JSON
//! arrays `[l, t, r, b]` inside the CSV cell so the geometry survives as one
//! column.

use std::io::Write;

use blockflow_core::{BlockflowError, LayoutRecord, Result};

/// Write records as CSV with the fixed column set
/// `page_index, position, bbox, label, text, layout_ppi`.
///
/// A missing `text` becomes an empty cell.
pub fn write_csv<W: Write>(records: &[LayoutRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["page_index", "position", "bbox", "label", "text", "layout_ppi"])
        .map_err(export_error)?;
    for record in records {
        let bbox = serde_json::to_string(&[
            record.bbox.l,
            record.bbox.t,
            record.bbox.r,
            record.bbox.b,
        ])
        .map_err(export_error)?;
        csv_writer
            .write_record([
                record.page_index.to_string(),
                record.position.to_string(),
                bbox,
                record.label.clone(),
                record.text.clone().unwrap_or_default(),
                record.layout_ppi.to_string(),
            ])
            .map_err(export_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records as a JSON array.
pub fn write_json<W: Write>(records: &[LayoutRecord], writer: W) -> Result<()> {
    serde_json::to_writer(writer, records).map_err(export_error)
}

fn export_error(err: impl std::fmt::Display) -> BlockflowError {
    BlockflowError::Export {
        reason: err.to_string(),
    }
}
