//! Reading-order estimation with capacity-gated degradation.
//!
//! The order model accepts at most `capacity` blocks in a single
//! page-equivalent call. Two invocation strategies exist:
//!
//! - **Whole-batch** (max throughput): when even the largest page stays under
//!   the ceiling, every page goes to the model in one call.
//! - **Degraded per-page**: as soon as any page would overflow, the whole
//!   document switches to one-page-per-call. Pages under the ceiling are
//!   scored normally; a page at or over the ceiling is not scored at all.
//!   Its estimate is a verbatim reuse of the most recently emitted page
//!   estimate, an explicit approximation that keeps the document flowing
//!   instead of failing it. If the very first page already overflows there is
//!   nothing to reuse and every position is the unranked sentinel.
//!
//! The fallback state is an explicit fold accumulator, never module state,
//! and the degraded path stays sequential: each step may depend on the
//! immediately preceding page's result.
//!
//! A degraded page's estimate can therefore have a different length than the
//! page's own block count. That is intentional (the estimate reproduces the
//! neighbor page exactly); the layout table builder completes per-block
//! coverage with the sentinel when it joins estimates onto blocks.

use blockflow_core::{BlockflowError, PageImage, PageLayout, Result, ORDER_UNRANKED};
use log::{debug, warn};

use crate::models::{OrderEstimator, OrderRequest};

/// Reading-order estimate for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrderEstimate {
    /// 0-based page index
    pub page_index: usize,
    /// Predicted positions, indexed by block index. For a degraded page this
    /// is the neighbor page's list and may not match this page's block count.
    pub positions: Vec<i32>,
}

/// Produce one reading-order estimate per page.
///
/// `pages` and `layouts` run in parallel (one layout per page raster);
/// `capacity` is the order model's hard per-call ceiling.
///
/// Every page receives an estimate; no page and no block is ever dropped.
pub fn estimate_reading_order(
    estimator: &dyn OrderEstimator,
    pages: &[PageImage],
    layouts: &[PageLayout],
    capacity: usize,
) -> Result<Vec<PageOrderEstimate>> {
    if pages.len() != layouts.len() {
        return Err(BlockflowError::Ordering {
            reason: format!(
                "{} page rasters but {} page layouts",
                pages.len(),
                layouts.len()
            ),
        });
    }
    if layouts.is_empty() {
        return Ok(Vec::new());
    }

    let largest = layouts
        .iter()
        .map(PageLayout::block_count)
        .max()
        .unwrap_or(0);

    if largest < capacity {
        estimate_whole_batch(estimator, pages, layouts)
    } else {
        debug!(
            "largest page has {largest} blocks (capacity {capacity}), \
             switching to per-page order estimation"
        );
        estimate_per_page(estimator, pages, layouts, capacity)
    }
}

/// Max-throughput path: a single call covering every page.
fn estimate_whole_batch(
    estimator: &dyn OrderEstimator,
    pages: &[PageImage],
    layouts: &[PageLayout],
) -> Result<Vec<PageOrderEstimate>> {
    let requests: Vec<OrderRequest<'_>> = pages
        .iter()
        .zip(layouts)
        .map(|(page, layout)| OrderRequest {
            image: page,
            bboxes: layout.bboxes(),
        })
        .collect();

    let results = estimator.estimate(&requests)?;
    if results.len() != layouts.len() {
        return Err(BlockflowError::Ordering {
            reason: format!(
                "estimator returned {} results for {} pages",
                results.len(),
                layouts.len()
            ),
        });
    }

    Ok(layouts
        .iter()
        .zip(results)
        .map(|(layout, positions)| PageOrderEstimate {
            page_index: layout.page_index,
            positions,
        })
        .collect())
}

/// Degraded path: one page per call, sequential, with the previous emitted
/// estimate as the fallback for un-scorable pages.
fn estimate_per_page(
    estimator: &dyn OrderEstimator,
    pages: &[PageImage],
    layouts: &[PageLayout],
    capacity: usize,
) -> Result<Vec<PageOrderEstimate>> {
    let mut estimates = Vec::with_capacity(layouts.len());
    let mut last: Option<Vec<i32>> = None;

    for (page, layout) in pages.iter().zip(layouts) {
        let block_count = layout.block_count();
        let positions = if block_count < capacity {
            let request = OrderRequest {
                image: page,
                bboxes: layout.bboxes(),
            };
            let mut results = estimator.estimate(&[request])?;
            if results.len() != 1 {
                return Err(BlockflowError::Ordering {
                    reason: format!(
                        "estimator returned {} results for a single-page call",
                        results.len()
                    ),
                });
            }
            results.pop().unwrap_or_default()
        } else {
            match &last {
                Some(previous) => {
                    warn!(
                        "page {} has {block_count} blocks (capacity {capacity}); \
                         reusing the previous page's order estimate",
                        layout.page_index
                    );
                    previous.clone()
                }
                None => {
                    warn!(
                        "page {} has {block_count} blocks (capacity {capacity}) \
                         and no prior page to borrow from; emitting unranked positions",
                        layout.page_index
                    );
                    vec![ORDER_UNRANKED; block_count]
                }
            }
        };

        last = Some(positions.clone());
        estimates.push(PageOrderEstimate {
            page_index: layout.page_index,
            positions,
        });
    }

    Ok(estimates)
}
