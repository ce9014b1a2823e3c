//! The ordered layout table and the final merged record set.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::geometry::BBox;

/// Sentinel position for a block that has no reading-order prediction.
///
/// Emitted when a page exceeded the order model's capacity ceiling, or when a
/// degraded neighbor estimate did not cover the block. Sorting ascending by
/// position puts these rows first within their page, which is the documented
/// policy: unordered blocks precede ordered ones.
pub const ORDER_UNRANKED: i32 = -1;

/// One row of the ordered layout table: a detected block plus its predicted
/// reading-order position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRow {
    /// Identity of the underlying block
    pub id: BlockId,
    /// Geometry at the layout resolution
    pub bbox: BBox,
    /// Detector label
    pub label: String,
    /// Detector confidence in [0, 1]
    pub confidence: f32,
    /// Optional finer-grained boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<[f32; 2]>>,
    /// 0-based reading-order rank within the page, or [`ORDER_UNRANKED`]
    pub position: i32,
}

/// The ordered layout table for one document.
///
/// Rows are sorted ascending by `(page_index, position)`; rows carrying the
/// [`ORDER_UNRANKED`] sentinel sort first within their page, in original
/// block-index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTable {
    /// Sorted rows, one per detected block
    pub rows: Vec<LayoutRow>,
    /// Resolution the row geometry is expressed at, in pixels per inch
    pub layout_ppi: f32,
}

impl LayoutTable {
    /// Number of rows (= number of detected blocks in the document).
    #[inline]
    #[must_use = "row count is computed but not used"]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[inline]
    #[must_use = "emptiness is computed but not used"]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Final output record: one per detected block, layout geometry joined with
/// recognized text.
///
/// The column set is fixed: `page_index`, `position`, `bbox`, `label`,
/// `text`, `layout_ppi`. `text` is `None` for blocks that never reached the
/// recognizer (capacity-skipped pages) or whose page produced no text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    /// 0-based page index
    pub page_index: usize,
    /// Reading-order rank within the page, or [`ORDER_UNRANKED`]
    pub position: i32,
    /// Geometry at `layout_ppi`
    pub bbox: BBox,
    /// Detector label
    pub label: String,
    /// Recognized text, if any
    pub text: Option<String>,
    /// Resolution `bbox` is expressed at, in pixels per inch
    pub layout_ppi: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unranked_sorts_before_ranked_positions() {
        assert!(ORDER_UNRANKED < 0);
        let mut positions = vec![2, ORDER_UNRANKED, 0, 1, ORDER_UNRANKED];
        positions.sort_unstable();
        assert_eq!(positions, vec![-1, -1, 0, 1, 2]);
    }

    #[test]
    fn layout_record_serializes_with_fixed_columns() {
        let record = LayoutRecord {
            page_index: 3,
            position: 7,
            bbox: BBox::new(1.0, 2.0, 3.0, 4.0),
            label: "Text".to_string(),
            text: Some("hello".to_string()),
            layout_ppi: 150.0,
        };
        // Struct serialization streams fields in declaration order
        let json = serde_json::to_string(&record).unwrap();
        let offsets: Vec<usize> = ["page_index", "position", "bbox", "label", "text", "layout_ppi"]
            .iter()
            .map(|col| json.find(&format!("\"{col}\"")).expect("column missing"))
            .collect();
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn missing_text_round_trips_as_null() {
        let record = LayoutRecord {
            page_index: 0,
            position: ORDER_UNRANKED,
            bbox: BBox::new(0.0, 0.0, 1.0, 1.0),
            label: "Figure".to_string(),
            text: None,
            layout_ppi: 96.0,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"text\":null"));
        let back: LayoutRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
