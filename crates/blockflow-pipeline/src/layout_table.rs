//! Joining detector output with order estimates into the ordered layout table.

use blockflow_core::{
    BlockflowError, LayoutRow, LayoutTable, PageLayout, Result, ORDER_UNRANKED,
};

use crate::ordering::PageOrderEstimate;

/// Build the ordered layout table: one row per detected block, with its
/// predicted reading-order position attached.
///
/// Positions join onto blocks by block index within each page; both sides
/// originate from detector output order, so the `BlockId` is the implicit
/// key. A block not covered by its page's estimate (degraded pages, or an
/// estimator that returned a short list) gets [`ORDER_UNRANKED`]; no block
/// is ever dropped.
///
/// Rows are stable-sorted ascending by `(page_index, position)`. The
/// sentinel sorts first within its page, and ties (in particular, multiple
/// unranked rows) keep their original block-index order.
pub fn build_layout_table(
    layouts: &[PageLayout],
    estimates: &[PageOrderEstimate],
    layout_ppi: f32,
) -> Result<LayoutTable> {
    if layouts.len() != estimates.len() {
        return Err(BlockflowError::Ordering {
            reason: format!(
                "{} page layouts but {} order estimates",
                layouts.len(),
                estimates.len()
            ),
        });
    }

    let row_count = layouts.iter().map(PageLayout::block_count).sum();
    let mut rows: Vec<LayoutRow> = Vec::with_capacity(row_count);

    for (layout, estimate) in layouts.iter().zip(estimates) {
        for (block_index, block) in layout.blocks.iter().enumerate() {
            let position = estimate
                .positions
                .get(block_index)
                .copied()
                .unwrap_or(ORDER_UNRANKED);
            rows.push(LayoutRow {
                id: block.id,
                bbox: block.bbox,
                label: block.label.clone(),
                confidence: block.confidence,
                polygon: block.polygon.clone(),
                position,
            });
        }
    }

    // Stable sort: unranked rows stay in block-index order within their page
    rows.sort_by_key(|row| (row.id.page_index, row.position));

    Ok(LayoutTable { rows, layout_ppi })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockflow_core::{BBox, Block, BlockId};

    fn layout_with_blocks(page_index: usize, count: usize) -> PageLayout {
        let blocks = (0..count)
            .map(|block_index| Block {
                id: BlockId::new(page_index, block_index),
                bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
                label: "Text".to_string(),
                confidence: 1.0,
                polygon: None,
            })
            .collect();
        PageLayout {
            page_index,
            image_bbox: BBox::new(0.0, 0.0, 612.0, 792.0),
            blocks,
        }
    }

    fn estimate(page_index: usize, positions: Vec<i32>) -> PageOrderEstimate {
        PageOrderEstimate {
            page_index,
            positions,
        }
    }

    #[test]
    fn rows_sort_by_position_with_unranked_first() {
        let layouts = vec![layout_with_blocks(0, 5)];
        let estimates = vec![estimate(0, vec![2, ORDER_UNRANKED, 0, ORDER_UNRANKED, 1])];

        let table = build_layout_table(&layouts, &estimates, 96.0).unwrap();

        let order: Vec<(usize, i32)> = table
            .rows
            .iter()
            .map(|row| (row.id.block_index, row.position))
            .collect();
        // The two unranked rows come first, in original block-index order
        assert_eq!(order, vec![(1, -1), (3, -1), (2, 0), (4, 1), (0, 2)]);
    }

    #[test]
    fn uncovered_blocks_fall_back_to_the_sentinel() {
        // Degraded page: 4 blocks, borrowed estimate only covers 2
        let layouts = vec![layout_with_blocks(0, 4)];
        let estimates = vec![estimate(0, vec![1, 0])];

        let table = build_layout_table(&layouts, &estimates, 96.0).unwrap();

        assert_eq!(table.len(), 4);
        let unranked: Vec<usize> = table
            .rows
            .iter()
            .filter(|row| row.position == ORDER_UNRANKED)
            .map(|row| row.id.block_index)
            .collect();
        assert_eq!(unranked, vec![2, 3]);
    }

    #[test]
    fn oversized_estimates_are_ignored_past_the_block_count() {
        // Borrowed from a bigger neighbor: estimate longer than the page
        let layouts = vec![layout_with_blocks(0, 2)];
        let estimates = vec![estimate(0, vec![1, 0, 2, 3, 4])];

        let table = build_layout_table(&layouts, &estimates, 96.0).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].position, 0);
        assert_eq!(table.rows[1].position, 1);
    }

    #[test]
    fn pages_sort_ascending_before_positions() {
        let layouts = vec![layout_with_blocks(0, 2), layout_with_blocks(1, 2)];
        let estimates = vec![estimate(0, vec![1, 0]), estimate(1, vec![0, 1])];

        let table = build_layout_table(&layouts, &estimates, 96.0).unwrap();

        let pages: Vec<usize> = table.rows.iter().map(|row| row.id.page_index).collect();
        assert_eq!(pages, vec![0, 0, 1, 1]);
    }

    #[test]
    fn every_block_appears_exactly_once() {
        let layouts = vec![layout_with_blocks(0, 3), layout_with_blocks(1, 300)];
        let estimates = vec![
            estimate(0, vec![2, 0, 1]),
            estimate(1, vec![2, 0, 1]), // degraded: borrowed 3-long estimate
        ];

        let table = build_layout_table(&layouts, &estimates, 96.0).unwrap();

        assert_eq!(table.len(), 303);
        let mut ids: Vec<BlockId> = table.rows.iter().map(|row| row.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 303, "no block dropped, none duplicated");
    }

    #[test]
    fn estimate_count_mismatch_is_an_error() {
        let layouts = vec![layout_with_blocks(0, 1)];
        let err = build_layout_table(&layouts, &[], 96.0).unwrap_err();
        assert!(matches!(err, BlockflowError::Ordering { .. }));
    }
}
