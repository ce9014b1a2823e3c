//! Detected blocks and their identity.

use serde::{Deserialize, Serialize};

use crate::geometry::BBox;

/// Unique identity of a detected block within a document.
///
/// Assigned exactly once, in detector output order, when a page's blocks are
/// first produced: `page_index` is the 0-based page, `block_index` the
/// 0-based position of the block in that page's detector output. Every
/// derived table (order estimates, crops, recognized text, the final merged
/// records) joins on this key and nothing else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockId {
    /// 0-based page index, unique per document
    pub page_index: usize,
    /// 0-based block index, unique within a page
    pub block_index: usize,
}

impl BlockId {
    /// Create a new block identity.
    #[inline]
    #[must_use = "block id is created but not used"]
    pub const fn new(page_index: usize, block_index: usize) -> Self {
        Self {
            page_index,
            block_index,
        }
    }
}

/// One detected content region on a page.
///
/// Immutable after detection; the reading-order position and recognized text
/// live in the derived tables, keyed by [`BlockId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Identity of this block
    pub id: BlockId,
    /// Geometry in pixels at the resolution the block was detected at
    pub bbox: BBox,
    /// Categorical label as emitted by the detector (Text, Table, Figure, ...)
    pub label: String,
    /// Detector confidence in [0, 1]
    pub confidence: f32,
    /// Optional finer-grained boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<[f32; 2]>>,
}

/// Layout detector output for a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// 0-based page index
    pub page_index: usize,
    /// Full page extent at the detection resolution
    pub image_bbox: BBox,
    /// Detected blocks, in detector output order (this order defines each
    /// block's `block_index`)
    pub blocks: Vec<Block>,
}

impl PageLayout {
    /// Number of blocks detected on this page.
    #[inline]
    #[must_use = "block count is computed but not used"]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The bboxes of this page's blocks, in block-index order.
    #[must_use = "bboxes are collected but not used"]
    pub fn bboxes(&self) -> Vec<BBox> {
        self.blocks.iter().map(|block| block.bbox).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_orders_by_page_then_block() {
        let mut ids = vec![
            BlockId::new(1, 0),
            BlockId::new(0, 2),
            BlockId::new(0, 1),
            BlockId::new(1, 1),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                BlockId::new(0, 1),
                BlockId::new(0, 2),
                BlockId::new(1, 0),
                BlockId::new(1, 1),
            ]
        );
    }

    #[test]
    fn bboxes_preserve_block_order() {
        let layout = PageLayout {
            page_index: 0,
            image_bbox: BBox::new(0.0, 0.0, 100.0, 100.0),
            blocks: vec![
                Block {
                    id: BlockId::new(0, 0),
                    bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
                    label: "Text".to_string(),
                    confidence: 0.9,
                    polygon: None,
                },
                Block {
                    id: BlockId::new(0, 1),
                    bbox: BBox::new(0.0, 20.0, 10.0, 30.0),
                    label: "Table".to_string(),
                    confidence: 0.8,
                    polygon: None,
                },
            ],
        };
        let bboxes = layout.bboxes();
        assert_eq!(bboxes.len(), 2);
        assert_eq!(bboxes[0].t, 0.0);
        assert_eq!(bboxes[1].t, 20.0);
    }
}
