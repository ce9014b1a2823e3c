//! Final left join of layout geometry with recognized text.

use std::collections::HashMap;

use blockflow_core::{BlockId, LayoutRecord, LayoutTable};

/// Attach recognized text to the ordered layout table, producing the final
/// record set.
///
/// Left join by [`BlockId`]: every table row appears exactly once in the
/// output, in table order. Rows without a matching text entry (blocks on
/// capacity-skipped pages, or ids the recognizer never saw) keep
/// `text: None`.
#[must_use = "returns the merged records, inputs are consumed"]
pub fn merge_layout_ocr(
    table: LayoutTable,
    mut texts: HashMap<BlockId, String>,
) -> Vec<LayoutRecord> {
    let layout_ppi = table.layout_ppi;
    table
        .rows
        .into_iter()
        .map(|row| LayoutRecord {
            page_index: row.id.page_index,
            position: row.position,
            bbox: row.bbox,
            label: row.label,
            text: texts.remove(&row.id),
            layout_ppi,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockflow_core::{BBox, LayoutRow, ORDER_UNRANKED};

    fn row(page_index: usize, block_index: usize, position: i32) -> LayoutRow {
        LayoutRow {
            id: BlockId::new(page_index, block_index),
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            label: "Text".to_string(),
            confidence: 1.0,
            polygon: None,
            position,
        }
    }

    #[test]
    fn every_row_appears_once_with_its_text() {
        let table = LayoutTable {
            rows: vec![row(0, 0, 0), row(0, 1, 1), row(1, 0, 0)],
            layout_ppi: 150.0,
        };
        let texts = HashMap::from([
            (BlockId::new(0, 0), "alpha".to_string()),
            (BlockId::new(0, 1), "beta".to_string()),
            (BlockId::new(1, 0), "gamma".to_string()),
        ]);

        let records = merge_layout_ocr(table, texts);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].text.as_deref(), Some("alpha"));
        assert_eq!(records[1].text.as_deref(), Some("beta"));
        assert_eq!(records[2].text.as_deref(), Some("gamma"));
        assert!(records.iter().all(|r| r.layout_ppi == 150.0));
    }

    #[test]
    fn unmatched_rows_keep_null_text() {
        // Page 1 was capacity-skipped: no OCR entries for it
        let table = LayoutTable {
            rows: vec![row(0, 0, 0), row(1, 0, ORDER_UNRANKED), row(1, 1, ORDER_UNRANKED)],
            layout_ppi: 96.0,
        };
        let texts = HashMap::from([(BlockId::new(0, 0), "only".to_string())]);

        let records = merge_layout_ocr(table, texts);

        assert_eq!(records[0].text.as_deref(), Some("only"));
        assert_eq!(records[1].text, None);
        assert_eq!(records[2].text, None);
    }

    #[test]
    fn table_order_is_preserved() {
        let table = LayoutTable {
            rows: vec![row(0, 2, ORDER_UNRANKED), row(0, 0, 0), row(0, 1, 1)],
            layout_ppi: 96.0,
        };

        let records = merge_layout_ocr(table, HashMap::new());

        let positions: Vec<i32> = records.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![ORDER_UNRANKED, 0, 1]);
    }
}
